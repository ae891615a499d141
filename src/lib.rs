//! Zycules Runner - side-scrolling endless runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio, rigid-body physics and raw input capture live outside this
//! crate and talk to it through `sim::tick`, `sim::PhysicsBackend` and the
//! per-tick `sim::GameEvent` list.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use std::time::Duration;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (~60 Hz)
    pub const SIM_DT: Duration = Duration::from_millis(16);
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible world dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 450.0;

    /// Ground strip height at the bottom of the world
    pub const GROUND_HEIGHT: f32 = 20.0;
    /// Top surface of the ground (screen y grows downward)
    pub const GROUND_Y: f32 = WORLD_HEIGHT - GROUND_HEIGHT;
}

/// Fixed timestep accumulator.
///
/// Converts variable frame times into a whole number of `SIM_DT` ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: Duration,
    accumulator: Duration,
    max_substeps: u32,
}

impl FixedTimestep {
    pub fn new(dt: Duration, max_substeps: u32) -> Self {
        Self {
            dt,
            accumulator: Duration::ZERO,
            max_substeps,
        }
    }

    /// Add frame time and return how many fixed ticks to run now.
    ///
    /// Backlog beyond `max_substeps` ticks is dropped.
    pub fn accumulate(&mut self, frame_dt: Duration) -> u32 {
        if self.dt.is_zero() {
            return 0;
        }
        self.accumulator += frame_dt;
        let cap = self.dt * self.max_substeps;
        if self.accumulator > cap {
            self.accumulator = cap;
        }
        let mut steps = 0;
        while self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0)
    pub fn alpha(&self) -> f32 {
        if self.dt.is_zero() {
            return 0.0;
        }
        self.accumulator.as_secs_f32() / self.dt.as_secs_f32()
    }

    pub fn dt(&self) -> Duration {
        self.dt
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(consts::SIM_DT, consts::MAX_SUBSTEPS)
    }
}
