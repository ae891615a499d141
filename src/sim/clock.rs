//! Simulated time and world scroll

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed run time and background scroll offset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    /// Total simulated time while running
    pub elapsed: Duration,
    /// Horizontal background offset (units), for the tiled backdrop
    pub scroll_offset: f64,
    /// Ticks advanced
    pub ticks: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick at the given scroll speed
    pub fn advance(&mut self, dt: Duration, scroll_speed: f32) {
        self.elapsed += dt;
        self.scroll_offset += f64::from(scroll_speed) * dt.as_secs_f64();
        self.ticks += 1;
    }
}
