//! Live obstacles and tokens

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

pub type EntityId = u32;

/// What a spawned entity does on contact with the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Solid; ends the run
    Obstacle,
    /// Overlap-only; collected for score
    Token,
}

/// A scrolling obstacle or token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnableEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Index into `Tuning::obstacle_variants` (obstacles only)
    pub variant: Option<usize>,
    /// Box center
    pub pos: Vec2,
    pub vel: Vec2,
    /// Box edge lengths
    pub size: Vec2,
    pub alive: bool,
}

impl SpawnableEntity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size / 2.0)
    }
}

/// Owns every live entity, in spawn (id) order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: Vec<SpawnableEntity>,
    cull_threshold: f32,
    frozen: bool,
}

impl EntityRegistry {
    pub fn new(cull_threshold: f32) -> Self {
        Self {
            entities: Vec::new(),
            cull_threshold,
            frozen: false,
        }
    }

    /// Take ownership of a new entity. Ignored once frozen.
    pub fn insert(&mut self, entity: SpawnableEntity) -> bool {
        if self.frozen {
            return false;
        }
        debug_assert!(self.entities.last().is_none_or(|e| e.id < entity.id));
        self.entities.push(entity);
        true
    }

    /// Move every live entity by `vel * dt`
    pub fn advance(&mut self, dt: f32) {
        if self.frozen {
            return;
        }
        for entity in self.entities.iter_mut().filter(|e| e.alive) {
            entity.pos += entity.vel * dt;
        }
    }

    /// Remove entities left of the cull threshold; returns their ids
    pub fn cull(&mut self) -> Vec<EntityId> {
        if self.frozen {
            return Vec::new();
        }
        let threshold = self.cull_threshold;
        let mut culled = Vec::new();
        self.entities.retain(|e| {
            let keep = e.pos.x >= threshold;
            if !keep {
                culled.push(e.id);
            }
            keep
        });
        culled
    }

    /// Remove one entity (e.g. a collected token). Unknown ids are a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<SpawnableEntity> {
        if self.frozen {
            return None;
        }
        let idx = self.entities.iter().position(|e| e.id == id)?;
        let mut entity = self.entities.remove(idx);
        entity.alive = false;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&SpawnableEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpawnableEntity> {
        self.entities.iter()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn cull_threshold(&self) -> f32 {
        self.cull_threshold
    }

    /// Stop all movement, culling and mutation; entities stay where they are
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
