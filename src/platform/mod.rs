//! Platform abstraction layer
//!
//! Handles the parts of the frame loop that depend on real time:
//! - Fixed-step clock (wall time -> simulation ticks)

pub mod clock;

pub use clock::FixedStepClock;
