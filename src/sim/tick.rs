//! Simulation tick
//!
//! Core game loop that advances one run deterministically. Order within a tick:
//! clock, jump input, spawners (obstacle then token), registry move, registry
//! cull, actor gravity and integration, physics contacts, collision resolution.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::collision::{CollisionEvent, PhysicsBackend, resolve_collisions};
use super::rng::RngSource;
use super::state::{DespawnReason, GameEvent, GamePhase, GameState};

/// Input signals for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Jump key/pointer currently down (level-triggered; edges are derived)
    pub jump_held: bool,
}

/// What happened during one tick, for the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// Contacts physics reported this tick
    pub contacts: Vec<CollisionEvent>,
}

/// Advance the game state by one tick of `dt`.
///
/// Once the run is over this only drains pending events.
pub fn tick<R, P>(
    state: &mut GameState<R>,
    input: &TickInput,
    physics: &mut P,
    dt: Duration,
) -> TickReport
where
    R: RngSource,
    P: PhysicsBackend + ?Sized,
{
    if state.phase == GamePhase::GameOver {
        return TickReport {
            events: std::mem::take(&mut state.events),
            contacts: Vec::new(),
        };
    }

    let dt_secs = dt.as_secs_f32();
    let speed = state.tuning.scroll_speed;
    state.clock.advance(dt, speed);
    state
        .score
        .add_distance(f64::from(speed) * dt.as_secs_f64());

    if state.jump_input.update(input.jump_held) {
        state.request_jump();
    }

    spawn_entities(state, dt);

    state.registry.advance(dt_secs);
    for id in state.registry.cull() {
        log::debug!("Culled entity {}", id);
        state.events.push(GameEvent::Despawned {
            id,
            reason: DespawnReason::Culled,
        });
    }

    state.controller.apply_gravity(&mut state.actor, dt_secs);
    state.controller.integrate(&mut state.actor, dt_secs);

    let contacts = physics.detect(&mut state.actor, &state.registry);
    let on_ground = contacts.contains(&CollisionEvent::GroundContact);
    state.controller.apply_ground_report(&mut state.actor, on_ground);

    resolve_collisions(state, &contacts);

    TickReport {
        events: std::mem::take(&mut state.events),
        contacts,
    }
}

/// Run both spawners, obstacle first
fn spawn_entities<R: RngSource>(state: &mut GameState<R>, dt: Duration) {
    let requests = [
        state.obstacle_spawner.tick(dt, &mut state.rng),
        state.token_spawner.tick(dt, &mut state.rng),
    ];

    for request in requests.into_iter().flatten() {
        let id = state.next_entity_id();
        let entity = request.into_entity(id);
        log::debug!(
            "Spawned {:?} {} at ({:.1}, {:.1}) t={:?}",
            entity.kind,
            id,
            entity.pos.x,
            entity.pos.y,
            state.clock.elapsed
        );
        state.events.push(GameEvent::Spawned {
            id,
            kind: entity.kind,
            variant: entity.variant,
            pos: entity.pos,
        });
        state.registry.insert(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::actor::Actor;
    use crate::sim::collision::ArcadePhysics;
    use crate::sim::registry::{EntityKind, EntityRegistry};
    use crate::sim::rng::SequenceRng;
    use crate::tuning::Tuning;

    /// Physics stub that replays scripted contacts and never touches the actor
    struct Scripted(Vec<Vec<CollisionEvent>>);

    impl PhysicsBackend for Scripted {
        fn detect(
            &mut self,
            _actor: &mut Actor,
            _registry: &EntityRegistry,
        ) -> Vec<CollisionEvent> {
            if self.0.is_empty() {
                Vec::new()
            } else {
                self.0.remove(0)
            }
        }
    }

    #[test]
    fn test_distance_follows_scroll_speed() {
        let mut state = GameState::new(12345, Tuning::default()).unwrap();
        let mut physics = ArcadePhysics::default();
        for _ in 0..125 {
            tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        }
        // 2 seconds at 200 units/s
        assert!((state.distance() - 400.0).abs() < 1e-6);
        assert_eq!(state.clock.ticks, 125);
    }

    #[test]
    fn test_held_jump_triggers_once() {
        let mut state = GameState::new(12345, Tuning::default()).unwrap();
        let mut physics = ArcadePhysics::default();
        let held = TickInput { jump_held: true };

        let report = tick(&mut state, &held, &mut physics, SIM_DT);
        assert!(report.events.contains(&GameEvent::Jumped));
        assert!(state.actor.vel_y < 0.0);

        // Keep holding through the whole arc and the landing
        let mut jumps = 0;
        for _ in 0..200 {
            let report = tick(&mut state, &held, &mut physics, SIM_DT);
            jumps += report
                .events
                .iter()
                .filter(|e| **e == GameEvent::Jumped)
                .count();
        }
        assert_eq!(jumps, 0);
        assert!(state.actor.grounded);

        // Release and press again
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        let report = tick(&mut state, &held, &mut physics, SIM_DT);
        assert!(report.events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let mut physics = ArcadePhysics::default();
        let ground_y = state.actor.pos.y;
        assert!(state.request_jump());

        let mut peak = ground_y;
        for _ in 0..120 {
            state.update(SIM_DT, &mut physics);
            peak = peak.min(state.actor.pos.y);
        }
        // v²/2g = 450²/2000 ≈ 101 units
        assert!(ground_y - peak > 90.0 && ground_y - peak < 110.0);
        assert_eq!(state.actor.pos.y, ground_y);
        assert!(state.actor.grounded);
    }

    #[test]
    fn test_spawned_entities_move_and_cull() {
        let tuning = Tuning {
            obstacle_interval_ms: 16,
            obstacle_spawn_probability: 1.0,
            token_spawn_probability: 0.0,
            ..Default::default()
        };
        // No contacts at all, so nothing ends the run
        let mut state = GameState::with_rng(tuning, SequenceRng::new(vec![0.0])).unwrap();
        let mut physics = Scripted(Vec::new());

        let report = tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        let spawned = report
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::Spawned {
                        kind: EntityKind::Obstacle,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(spawned, 1);
        let first = state.registry.get(1).map(|e| e.pos.x).unwrap_or_default();
        // Spawned then advanced in the same tick
        assert!((first - (state.tuning.spawn_x - 3.2)).abs() < 1e-3);

        // 900 units to travel at 200/s: ~4.5s, one spawn per tick
        let mut culled = 0;
        for _ in 0..400 {
            let report = tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
            culled += report
                .events
                .iter()
                .filter(|e| {
                    matches!(
                        e,
                        GameEvent::Despawned {
                            reason: DespawnReason::Culled,
                            ..
                        }
                    )
                })
                .count();
            let threshold = state.registry.cull_threshold();
            assert!(state.registry.iter().all(|e| e.pos.x >= threshold));
        }
        assert!(culled > 0);
        // Bounded by travel time / spawn interval
        assert!(state.registry.len() <= 300);
    }

    #[test]
    fn test_game_over_freezes_everything() {
        let tuning = Tuning {
            obstacle_interval_ms: 16,
            obstacle_spawn_probability: 1.0,
            ..Default::default()
        };
        let mut state = GameState::with_rng(tuning, SequenceRng::new(vec![0.0])).unwrap();
        let mut physics = Scripted(vec![
            Vec::new(),
            vec![CollisionEvent::ObstacleContact { obstacle: 1 }],
        ]);

        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        let report = tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(
            report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { obstacle: 1, .. }))
        );

        let distance = state.distance();
        let score = state.score();
        let entities: Vec<_> = state.registry.iter().cloned().collect();
        let actor = state.actor.clone();
        let ticks = state.clock.ticks;

        for _ in 0..100 {
            let input = TickInput { jump_held: true };
            let report = tick(&mut state, &input, &mut physics, SIM_DT);
            assert!(report.events.is_empty());
            assert!(report.contacts.is_empty());
        }

        assert_eq!(state.distance(), distance);
        assert_eq!(state.score(), score);
        assert_eq!(state.registry.iter().cloned().collect::<Vec<_>>(), entities);
        assert_eq!(state.actor, actor);
        assert_eq!(state.clock.ticks, ticks);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning {
            obstacle_interval_ms: 500,
            token_interval_ms: 300,
            ..Default::default()
        };
        let mut state1 = GameState::new(99999, tuning.clone()).unwrap();
        let mut state2 = GameState::new(99999, tuning).unwrap();
        let mut physics = ArcadePhysics::default();

        let mut log1 = Vec::new();
        let mut log2 = Vec::new();
        for i in 0..600 {
            let input = TickInput {
                jump_held: i % 40 < 3,
            };
            log1.extend(tick(&mut state1, &input, &mut physics, SIM_DT).events);
            log2.extend(tick(&mut state2, &input, &mut physics, SIM_DT).events);
        }

        assert_eq!(log1, log2);
        assert_eq!(state1.score(), state2.score());
        assert_eq!(state1.phase(), state2.phase());
        assert_eq!(state1.actor, state2.actor);
    }
}
