//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. Values can
//! be loaded from JSON; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GROUND_Y, WORLD_WIDTH};

/// Errors from loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be within [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("obstacle_variants must name at least one variant")]
    NoObstacleVariants,
    #[error("token_band is inverted: {0} > {1}")]
    InvertedTokenBand(i32, i32),
    #[error("scroll_speed must be positive and finite, got {0}")]
    NonPositiveScrollSpeed(f32),
    #[error("jump_impulse must be negative (upward) and finite, got {0}")]
    NonNegativeJumpImpulse(f32),
}

/// Gameplay tuning for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration on the actor (units/s²)
    pub gravity: f32,
    /// Vertical velocity set by a jump (units/s, negative is up)
    pub jump_impulse: f32,
    /// World scroll speed, shared by all spawned entities (units/s)
    pub scroll_speed: f32,

    /// Time between obstacle spawn attempts
    pub obstacle_interval_ms: u64,
    /// Chance that an obstacle attempt actually spawns
    pub obstacle_spawn_probability: f32,
    /// Obstacle variants, picked uniformly
    pub obstacle_variants: Vec<String>,

    /// Time between token spawn attempts
    pub token_interval_ms: u64,
    /// Chance that a token attempt actually spawns
    pub token_spawn_probability: f32,
    /// Inclusive y range for a token's bottom edge
    pub token_band: (i32, i32),
    /// Score awarded per collected token
    pub token_reward: u64,

    /// Entities whose x drops below this are removed
    pub cull_threshold: f32,
    /// Spawn x, just past the right edge of the world
    pub spawn_x: f32,
    /// Fixed horizontal position of the actor
    pub actor_x: f32,

    /// Bounding box edge lengths
    pub actor_size: f32,
    pub obstacle_size: f32,
    pub token_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            jump_impulse: -450.0,
            scroll_speed: 200.0,

            obstacle_interval_ms: 2500,
            obstacle_spawn_probability: 0.4,
            obstacle_variants: vec!["rugpull".to_string(), "gastrap".to_string()],

            token_interval_ms: 1800,
            token_spawn_probability: 0.5,
            token_band: (GROUND_Y as i32 - 130, GROUND_Y as i32 - 10),
            token_reward: 10,

            cull_threshold: -50.0,
            spawn_x: WORLD_WIDTH + 50.0,
            actor_x: 100.0,

            actor_size: 48.0,
            obstacle_size: 32.0,
            token_size: 16.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning from a file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Check that every field is in a range the simulation can run with
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("obstacle_spawn_probability", self.obstacle_spawn_probability),
            ("token_spawn_probability", self.token_spawn_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::InvalidProbability { field, value });
            }
        }
        if self.obstacle_interval_ms == 0 {
            return Err(TuningError::ZeroInterval {
                field: "obstacle_interval_ms",
            });
        }
        if self.token_interval_ms == 0 {
            return Err(TuningError::ZeroInterval {
                field: "token_interval_ms",
            });
        }
        if self.obstacle_variants.is_empty() {
            return Err(TuningError::NoObstacleVariants);
        }
        let (lo, hi) = self.token_band;
        if lo > hi {
            return Err(TuningError::InvertedTokenBand(lo, hi));
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed <= 0.0 {
            return Err(TuningError::NonPositiveScrollSpeed(self.scroll_speed));
        }
        if !self.jump_impulse.is_finite() || self.jump_impulse >= 0.0 {
            return Err(TuningError::NonNegativeJumpImpulse(self.jump_impulse));
        }
        Ok(())
    }

    /// Name of an obstacle variant by index
    pub fn obstacle_variant_name(&self, variant: usize) -> Option<&str> {
        self.obstacle_variants.get(variant).map(String::as_str)
    }
}
