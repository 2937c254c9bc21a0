//! Fixed timestep accumulator
//!
//! Converts variable frame times into a whole number of fixed simulation
//! ticks, carrying the remainder to the next frame.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Shortest tick we accept (1000 ticks per second)
const MIN_STEP_SECONDS: f32 = 0.001;

/// Longest frame we account for; anything slower is treated as a hitch
const MAX_FRAME_SECONDS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedStepClock {
    /// Clock producing one tick every `step` seconds
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() {
            step.max(MIN_STEP_SECONDS)
        } else {
            SIM_DT
        };
        Self {
            step,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Seconds per tick
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed elapsed frame time; returns how many ticks to run now.
    ///
    /// Capped at `MAX_SUBSTEPS` per frame to prevent a spiral of death; time
    /// beyond the cap is dropped rather than carried forward.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_SECONDS)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }

    /// Time left until the next tick is due
    pub fn until_next_tick(&self) -> f32 {
        (self.step - self.accumulator).max(0.0)
    }
}
