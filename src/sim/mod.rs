//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only from the `dt` handed to each tick
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod clock;
pub mod collision;
pub mod registry;
pub mod rng;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorController, JumpInput};
pub use clock::Clock;
pub use collision::{Aabb, ArcadePhysics, CollisionEvent, PhysicsBackend, resolve_collisions};
pub use registry::{EntityId, EntityKind, EntityRegistry, SpawnableEntity};
pub use rng::{RngSource, SeededRng, SequenceRng};
pub use score::ScoreKeeper;
pub use spawner::{EntitySpawner, SpawnRequest, SpawnTimer};
pub use state::{DespawnReason, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, TickReport, tick};
