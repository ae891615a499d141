//! Periodic, probability-gated spawning of obstacles and tokens

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::registry::{EntityId, EntityKind, SpawnableEntity};
use super::rng::RngSource;
use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fixed-interval timer driven by accumulated tick time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub interval: Duration,
    pub accumulated: Duration,
    cancelled: bool,
}

impl SpawnTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
            cancelled: false,
        }
    }

    /// Accumulate `dt`; true when the interval has elapsed.
    ///
    /// Fires at most once per call. Only the time already spent in the next
    /// period is carried over; whole periods skipped by a long `dt` are
    /// dropped.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.cancelled || self.interval.is_zero() {
            return false;
        }
        self.accumulated += dt;
        if self.accumulated < self.interval {
            return false;
        }
        let rem = self.accumulated.as_nanos() % self.interval.as_nanos();
        self.accumulated = Duration::new(
            (rem / NANOS_PER_SEC) as u64,
            (rem % NANOS_PER_SEC) as u32,
        );
        true
    }

    /// Stop firing for good
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Where a spawned entity's y comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Placement {
    /// Resting on the ground, variant picked from `variants`
    Ground { variants: usize },
    /// Bottom edge drawn from an inclusive y band
    Band { lo: i32, hi: i32 },
}

/// A successful spawn attempt, before it is given an id
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    pub variant: Option<usize>,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl SpawnRequest {
    pub fn into_entity(self, id: EntityId) -> SpawnableEntity {
        SpawnableEntity {
            id,
            kind: self.kind,
            variant: self.variant,
            pos: self.pos,
            vel: self.vel,
            size: self.size,
            alive: true,
        }
    }
}

/// Periodic spawn process for one entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawner {
    pub kind: EntityKind,
    pub timer: SpawnTimer,
    /// Chance that an attempt spawns (`roll < probability`)
    pub probability: f32,
    spawn_x: f32,
    speed: f32,
    size: f32,
    placement: Placement,
    /// Attempts made so far (fired timer periods)
    pub attempts: u32,
}

impl EntitySpawner {
    pub fn obstacles(tuning: &Tuning) -> Self {
        Self {
            kind: EntityKind::Obstacle,
            timer: SpawnTimer::new(Duration::from_millis(tuning.obstacle_interval_ms)),
            probability: tuning.obstacle_spawn_probability,
            spawn_x: tuning.spawn_x,
            speed: tuning.scroll_speed,
            size: tuning.obstacle_size,
            placement: Placement::Ground {
                variants: tuning.obstacle_variants.len(),
            },
            attempts: 0,
        }
    }

    pub fn tokens(tuning: &Tuning) -> Self {
        let (lo, hi) = tuning.token_band;
        Self {
            kind: EntityKind::Token,
            timer: SpawnTimer::new(Duration::from_millis(tuning.token_interval_ms)),
            probability: tuning.token_spawn_probability,
            spawn_x: tuning.spawn_x,
            speed: tuning.scroll_speed,
            size: tuning.token_size,
            placement: Placement::Band { lo, hi },
            attempts: 0,
        }
    }

    /// Advance the timer and, if it fires, make one gated spawn attempt
    pub fn tick<R: RngSource + ?Sized>(
        &mut self,
        dt: Duration,
        rng: &mut R,
    ) -> Option<SpawnRequest> {
        if !self.timer.tick(dt) {
            return None;
        }
        self.attempts += 1;

        let roll = rng.next_f32();
        if roll >= self.probability {
            return None;
        }

        let half = self.size / 2.0;
        let (variant, y) = match self.placement {
            Placement::Ground { variants } => {
                let variant = if variants > 0 { rng.index(variants) } else { 0 };
                (Some(variant), GROUND_Y - half)
            }
            Placement::Band { lo, hi } => (None, rng.range_i32(lo, hi) as f32 - half),
        };

        Some(SpawnRequest {
            kind: self.kind,
            variant,
            pos: Vec2::new(self.spawn_x, y),
            vel: Vec2::new(-self.speed, 0.0),
            size: Vec2::splat(self.size),
        })
    }

    /// Cancel the timer; no further attempts
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceRng;

    const MS16: Duration = Duration::from_millis(16);

    #[test]
    fn test_timer_fires_on_interval_and_carries_remainder() {
        let mut timer = SpawnTimer::new(Duration::from_millis(40));
        assert!(!timer.tick(MS16));
        assert!(!timer.tick(MS16));
        assert!(timer.tick(MS16)); // 48ms
        assert_eq!(timer.accumulated, Duration::from_millis(8));
        assert!(!timer.tick(MS16)); // 24ms
        assert!(timer.tick(MS16)); // 40ms
        assert_eq!(timer.accumulated, Duration::ZERO);
    }

    #[test]
    fn test_long_dt_fires_once_and_drops_backlog() {
        let mut timer = SpawnTimer::new(Duration::from_millis(1000));
        assert!(timer.tick(Duration::from_millis(60_250)));
        assert_eq!(timer.accumulated, Duration::from_millis(250));
        // Next period needs another 750ms
        for _ in 0..46 {
            assert!(!timer.tick(MS16));
        }
        assert!(timer.tick(MS16)); // 250 + 47 * 16 = 1002ms
    }

    #[test]
    fn test_long_dt_spawns_no_burst() {
        let tuning = Tuning {
            token_interval_ms: 1000,
            token_spawn_probability: 1.0,
            ..Default::default()
        };
        let mut spawner = EntitySpawner::tokens(&tuning);
        let mut rng = SequenceRng::new(vec![0.5]);
        assert!(spawner.tick(Duration::from_secs(60), &mut rng).is_some());

        let spawned = (0..40)
            .filter_map(|_| spawner.tick(MS16, &mut rng))
            .count();
        assert_eq!(spawned, 0);
        assert_eq!(spawner.attempts, 1);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timer = SpawnTimer::new(Duration::from_millis(16));
        timer.cancel();
        assert!(!timer.tick(Duration::from_secs(10)));
        assert!(timer.is_cancelled());
    }

    #[test]
    fn test_gate_rejects_high_roll() {
        let tuning = Tuning {
            obstacle_interval_ms: 16,
            obstacle_spawn_probability: 0.4,
            ..Default::default()
        };
        let mut spawner = EntitySpawner::obstacles(&tuning);
        let mut rng = SequenceRng::new(vec![0.4]);
        assert!(spawner.tick(MS16, &mut rng).is_none());
        assert_eq!(spawner.attempts, 1);
    }

    #[test]
    fn test_obstacle_placement() {
        let tuning = Tuning {
            obstacle_interval_ms: 16,
            obstacle_spawn_probability: 0.4,
            ..Default::default()
        };
        let mut spawner = EntitySpawner::obstacles(&tuning);
        // gate roll, then variant roll
        let mut rng = SequenceRng::new(vec![0.1, 0.75]);
        let req = spawner.tick(MS16, &mut rng).unwrap();
        assert_eq!(req.kind, EntityKind::Obstacle);
        assert_eq!(req.variant, Some(1));
        assert_eq!(req.pos, Vec2::new(tuning.spawn_x, GROUND_Y - 16.0));
        assert_eq!(req.vel, Vec2::new(-tuning.scroll_speed, 0.0));
    }

    #[test]
    fn test_token_placement_in_band() {
        let tuning = Tuning {
            token_interval_ms: 16,
            token_spawn_probability: 1.0,
            token_band: (300, 420),
            ..Default::default()
        };
        let mut spawner = EntitySpawner::tokens(&tuning);
        let mut rng = SequenceRng::new(vec![0.5, 0.0]);
        let req = spawner.tick(MS16, &mut rng).unwrap();
        assert_eq!(req.kind, EntityKind::Token);
        assert_eq!(req.variant, None);
        // bottom edge at 300, box is 16 tall
        assert_eq!(req.pos.y, 292.0);
        let entity = req.into_entity(7);
        assert_eq!(entity.id, 7);
        assert!(entity.alive);
    }

    #[test]
    fn test_zero_probability_never_spawns() {
        let tuning = Tuning {
            token_interval_ms: 16,
            token_spawn_probability: 0.0,
            ..Default::default()
        };
        let mut spawner = EntitySpawner::tokens(&tuning);
        let mut rng = SequenceRng::new(vec![0.0]);
        for _ in 0..10 {
            assert!(spawner.tick(MS16, &mut rng).is_none());
        }
        assert_eq!(spawner.attempts, 10);
    }
}
