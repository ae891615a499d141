//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]; the tick loop owns it and
//! hands it to each component by reference.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorController, JumpInput};
use super::clock::Clock;
use super::collision::PhysicsBackend;
use super::registry::{EntityId, EntityKind, EntityRegistry};
use super::rng::{RngSource, SeededRng};
use super::score::ScoreKeeper;
use super::spawner::EntitySpawner;
use super::tick::{TickInput, TickReport, tick};
use crate::tuning::{Tuning, TuningError};

/// Run state machine. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Running,
    GameOver,
}

/// Why an entity left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    Culled,
    Collected,
}

/// Things the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned {
        id: EntityId,
        kind: EntityKind,
        variant: Option<usize>,
        pos: Vec2,
    },
    Despawned {
        id: EntityId,
        reason: DespawnReason,
    },
    TokenCollected {
        id: EntityId,
        reward: u64,
    },
    Jumped,
    /// Freeze the world, tint the actor, stop its animation
    GameOver {
        obstacle: EntityId,
        score: u64,
        distance: f64,
    },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState<R = SeededRng> {
    pub tuning: Tuning,
    pub rng: R,
    pub clock: Clock,
    pub(crate) phase: GamePhase,
    pub actor: Actor,
    pub controller: ActorController,
    pub jump_input: JumpInput,
    pub obstacle_spawner: EntitySpawner,
    pub token_spawner: EntitySpawner,
    pub registry: EntityRegistry,
    pub score: ScoreKeeper,
    /// Events raised since the last tick report
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState<SeededRng> {
    /// Create a new run with a seeded RNG
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Self::with_rng(tuning, SeededRng::new(seed))
    }
}

impl<R: RngSource> GameState<R> {
    /// Create a new run drawing from the given RNG.
    ///
    /// Fails if `tuning` does not validate.
    pub fn with_rng(tuning: Tuning, rng: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!(
            "Run start: speed={} obstacles every {}ms (p={}) tokens every {}ms (p={})",
            tuning.scroll_speed,
            tuning.obstacle_interval_ms,
            tuning.obstacle_spawn_probability,
            tuning.token_interval_ms,
            tuning.token_spawn_probability,
        );
        Ok(Self {
            actor: Actor::new(&tuning),
            controller: ActorController::new(&tuning),
            jump_input: JumpInput::default(),
            obstacle_spawner: EntitySpawner::obstacles(&tuning),
            token_spawner: EntitySpawner::tokens(&tuning),
            registry: EntityRegistry::new(tuning.cull_threshold),
            clock: Clock::new(),
            phase: GamePhase::Running,
            score: ScoreKeeper::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
            rng,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Edge-triggered jump. Honored only while running with the actor grounded.
    pub fn request_jump(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        let jumped = self.controller.request_jump(&mut self.actor);
        if jumped {
            self.events.push(GameEvent::Jumped);
        }
        jumped
    }

    /// Advance one tick with the jump key left as it was
    pub fn update<P: PhysicsBackend + ?Sized>(
        &mut self,
        dt: Duration,
        physics: &mut P,
    ) -> TickReport {
        let input = TickInput {
            jump_held: self.jump_input.is_held(),
        };
        tick(self, &input, physics, dt)
    }

    /// Running -> GameOver. Side effects fire once; later calls return false.
    pub fn end_run(&mut self, obstacle: EntityId) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.registry.freeze();
        self.obstacle_spawner.cancel();
        self.token_spawner.cancel();
        self.actor.mark_hit();

        log::info!(
            "Game over: hit obstacle {} at {:?}, {}",
            obstacle,
            self.clock.elapsed,
            self.score
        );
        self.events.push(GameEvent::GameOver {
            obstacle,
            score: self.score.score(),
            distance: self.score.distance(),
        });
        true
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn distance(&self) -> f64 {
        self.score.distance()
    }

    /// Current phase. Only the run itself can move it to `GameOver`:
    ///
    /// ```compile_fail
    /// use zycules_runner::Tuning;
    /// use zycules_runner::sim::{GamePhase, GameState};
    ///
    /// let mut state = GameState::new(1, Tuning::default()).unwrap();
    /// state.phase = GamePhase::Running;
    /// ```
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// HUD text
    pub fn display(&self) -> String {
        self.score.display(self.phase)
    }
}
