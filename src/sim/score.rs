//! Score and distance counters

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::GamePhase;

/// Run counters. Neither ever decreases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    score: u64,
    /// World units scrolled: `scroll_speed * elapsed seconds`
    distance: f64,
    tokens_collected: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn tokens_collected(&self) -> u32 {
        self.tokens_collected
    }

    /// Credit one collected token
    pub(crate) fn add_reward(&mut self, reward: u64) {
        self.score = self.score.saturating_add(reward);
        self.tokens_collected += 1;
    }

    /// Add distance for one tick; non-finite or negative amounts are ignored
    pub(crate) fn add_distance(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.distance += amount;
        }
    }

    /// HUD line for the given phase
    pub fn display(&self, phase: GamePhase) -> String {
        match phase {
            GamePhase::Running => self.to_string(),
            GamePhase::GameOver => format!("Game Over! {}", self),
        }
    }
}

impl fmt::Display for ScoreKeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Distance: {}  Score: {}",
            self.distance.floor() as u64,
            self.score
        )
    }
}
