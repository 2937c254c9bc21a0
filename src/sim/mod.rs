//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (insertion order per entity kind)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod score;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{CollisionReport, resolve_collisions, wave_hits_ship};
pub use score::ScoreBoard;
pub use snapshot::{EntitySnapshot, Snapshot, SnapshotDetail};
pub use spawn::{SpawnScheduler, ship_base_speed, ship_spawn_interval};
pub use state::{Body, Entity, EntityKind, EntityStore, GameEvent, GamePhase, GameState, Rect};
pub use tick::{TickInput, tick};
