//! Collision events, the physics collaborator seam, and outcome resolution
//!
//! Broad-phase detection belongs to whatever physics engine hosts the
//! simulation. It reports one list of [`CollisionEvent`]s per tick through
//! [`PhysicsBackend`]; [`resolve_collisions`] turns that list into score and
//! game-over effects. [`ArcadePhysics`] is a box-vs-box backend good enough for
//! headless runs and tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::registry::{EntityId, EntityKind, EntityRegistry};
use super::rng::RngSource;
use super::state::{DespawnReason, GameEvent, GamePhase, GameState};
use crate::consts::GROUND_Y;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// One contact or overlap reported by physics for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Actor resting on the ground
    GroundContact,
    /// Actor overlapping a token (non-solid)
    TokenOverlap { token: EntityId },
    /// Actor touching an obstacle (solid)
    ObstacleContact { obstacle: EntityId },
}

/// Physics collaborator: separates the actor from solid surfaces and reports
/// this tick's contacts.
///
/// Called once per running tick, after the actor has been integrated and all
/// entities have been moved and culled.
pub trait PhysicsBackend {
    fn detect(&mut self, actor: &mut Actor, registry: &EntityRegistry) -> Vec<CollisionEvent>;
}

/// Box-based arcade physics: flat ground, a ceiling at the top of the world,
/// and overlap tests against every live entity in registry order
#[derive(Debug, Clone, Copy)]
pub struct ArcadePhysics {
    pub ground_y: f32,
    pub ceiling_y: f32,
}

impl Default for ArcadePhysics {
    fn default() -> Self {
        Self {
            ground_y: GROUND_Y,
            ceiling_y: 0.0,
        }
    }
}

impl PhysicsBackend for ArcadePhysics {
    fn detect(&mut self, actor: &mut Actor, registry: &EntityRegistry) -> Vec<CollisionEvent> {
        let mut contacts = Vec::new();
        let half = actor.size / 2.0;

        if actor.pos.y + half.y >= self.ground_y {
            actor.pos.y = self.ground_y - half.y;
            actor.vel_y = actor.vel_y.min(0.0);
            contacts.push(CollisionEvent::GroundContact);
        }
        if actor.pos.y - half.y < self.ceiling_y {
            actor.pos.y = self.ceiling_y + half.y;
            actor.vel_y = actor.vel_y.max(0.0);
        }

        let bounds = actor.bounds();
        for entity in registry.iter().filter(|e| e.alive) {
            if !bounds.overlaps(&entity.bounds()) {
                continue;
            }
            contacts.push(match entity.kind {
                EntityKind::Token => CollisionEvent::TokenOverlap { token: entity.id },
                EntityKind::Obstacle => CollisionEvent::ObstacleContact {
                    obstacle: entity.id,
                },
            });
        }

        contacts
    }
}

/// Apply this tick's contacts to score and game state.
///
/// Ground contacts are consumed by the actor controller, not here. Events
/// naming entities that no longer exist, or of the wrong kind, are ignored.
/// Once the run is over nothing further has any effect.
pub fn resolve_collisions<R: RngSource>(state: &mut GameState<R>, contacts: &[CollisionEvent]) {
    for contact in contacts {
        if state.phase == GamePhase::GameOver {
            return;
        }

        match *contact {
            CollisionEvent::GroundContact => {}
            CollisionEvent::TokenOverlap { token } => {
                let is_token = state
                    .registry
                    .get(token)
                    .is_some_and(|e| e.kind == EntityKind::Token);
                if !is_token || state.registry.remove(token).is_none() {
                    log::trace!("Ignoring overlap with missing token {}", token);
                    continue;
                }
                let reward = state.tuning.token_reward;
                state.score.add_reward(reward);
                log::debug!("Collected token {} (+{})", token, reward);
                state.events.push(GameEvent::Despawned {
                    id: token,
                    reason: DespawnReason::Collected,
                });
                state.events.push(GameEvent::TokenCollected { id: token, reward });
            }
            CollisionEvent::ObstacleContact { obstacle } => {
                let is_obstacle = state
                    .registry
                    .get(obstacle)
                    .is_some_and(|e| e.kind == EntityKind::Obstacle);
                if !is_obstacle {
                    log::trace!("Ignoring contact with missing obstacle {}", obstacle);
                    continue;
                }
                state.end_run(obstacle);
            }
        }
    }
}
