//! Zycules Runner headless driver
//!
//! Plays one seeded run with arcade physics and a simple auto-jumper, then
//! prints a JSON summary. Usage: `zycules-runner [seed] [tuning.json]`.
//! Set `RUST_LOG=debug` to watch spawns and collections.

use std::time::Duration;

use serde::Serialize;

use zycules_runner::FixedTimestep;
use zycules_runner::sim::{
    ArcadePhysics, EntityKind, GameEvent, GamePhase, GameState, TickInput, tick,
};
use zycules_runner::tuning::{Tuning, TuningError};

/// Longest run the driver will simulate
const MAX_RUN: Duration = Duration::from_secs(300);
/// Simulated display refresh
const FRAME: Duration = Duration::from_micros(16_667);

/// Jump when an obstacle's leading edge is this far ahead of the actor
const JUMP_LEAD: (f32, f32) = (30.0, 70.0);

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    phase: Option<GamePhase>,
    ticks: u64,
    elapsed_ms: u128,
    score: u64,
    distance: f64,
    tokens_collected: u32,
    obstacles_spawned: u32,
    tokens_spawned: u32,
    jumps: u32,
    hud: String,
}

/// Game instance holding all state
struct Game {
    state: GameState,
    physics: ArcadePhysics,
    timestep: FixedTimestep,
    input: TickInput,
    summary: Summary,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Ok(Self {
            state: GameState::new(seed, tuning)?,
            physics: ArcadePhysics::default(),
            timestep: FixedTimestep::default(),
            input: TickInput::default(),
            summary: Summary {
                seed,
                ..Default::default()
            },
        })
    }

    /// Hold jump while an obstacle is inside the lead window
    fn think(&mut self) {
        let actor = &self.state.actor;
        let front = actor.bounds().max.x;
        self.input.jump_held = self.state.registry.iter().any(|e| {
            let gap = e.bounds().min.x - front;
            e.kind == EntityKind::Obstacle && (JUMP_LEAD.0..=JUMP_LEAD.1).contains(&gap)
        });
    }

    /// Run simulation ticks for one displayed frame
    fn frame(&mut self, frame_dt: Duration) {
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.think();
            let dt = self.timestep.dt();
            let report = tick(&mut self.state, &self.input, &mut self.physics, dt);
            for event in &report.events {
                match event {
                    GameEvent::Spawned { kind, .. } => match kind {
                        EntityKind::Obstacle => self.summary.obstacles_spawned += 1,
                        EntityKind::Token => self.summary.tokens_spawned += 1,
                    },
                    GameEvent::Jumped => self.summary.jumps += 1,
                    _ => {}
                }
            }
        }
    }

    fn run(mut self) -> Summary {
        let mut last_report = Duration::ZERO;
        while !self.state.is_game_over() && self.state.clock.elapsed < MAX_RUN {
            self.frame(FRAME);
            if self.state.clock.elapsed - last_report >= Duration::from_secs(10) {
                last_report = self.state.clock.elapsed;
                log::info!("{:?}: {}", self.state.clock.elapsed, self.state.display());
            }
        }

        let state = &self.state;
        Summary {
            phase: Some(state.phase()),
            ticks: state.clock.ticks,
            elapsed_ms: state.clock.elapsed.as_millis(),
            score: state.score(),
            distance: state.distance(),
            tokens_collected: state.score.tokens_collected(),
            hud: state.display(),
            ..self.summary
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            log::warn!("Invalid seed ({}), using 0", err);
            0
        }
        None => 0,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };

    log::info!("Zycules Runner starting (seed {})", seed);
    let summary = match Game::new(seed, tuning) {
        Ok(game) => game.run(),
        Err(err) => {
            log::error!("Invalid tuning: {}", err);
            std::process::exit(1);
        }
    };
    log::info!("{}", summary.hud);

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Failed to serialize summary: {}", err),
    }
}
