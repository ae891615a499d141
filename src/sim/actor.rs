//! The player-controlled runner and its vertical motion

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

/// The single runner. Horizontal position is fixed; the world scrolls past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Box center (screen y grows downward)
    pub pos: Vec2,
    /// Vertical velocity (negative is up)
    pub vel_y: f32,
    /// Box edge lengths
    pub size: Vec2,
    /// Standing on the ground, as last reported by physics
    pub grounded: bool,
    pub alive: bool,
    /// Hit tint requested from the renderer
    pub hit: bool,
    /// Run animation playing
    pub animating: bool,
}

impl Actor {
    /// Spawn standing on the ground at the tuned x
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.actor_size);
        Self {
            pos: Vec2::new(tuning.actor_x, GROUND_Y - size.y / 2.0),
            vel_y: 0.0,
            size,
            grounded: true,
            alive: true,
            hit: false,
            animating: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size / 2.0)
    }

    /// Mark as hit and stop the run animation. Returns false if already hit.
    pub fn mark_hit(&mut self) -> bool {
        if self.hit {
            return false;
        }
        self.hit = true;
        self.animating = false;
        true
    }
}

/// Applies gravity and jump impulses to the actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorController {
    pub gravity: f32,
    pub jump_impulse: f32,
}

impl ActorController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            gravity: tuning.gravity,
            jump_impulse: tuning.jump_impulse,
        }
    }

    pub fn apply_gravity(&self, actor: &mut Actor, dt: f32) {
        if !actor.alive {
            return;
        }
        actor.vel_y += self.gravity * dt;
    }

    /// Jump if grounded. Airborne requests are dropped, not buffered.
    ///
    /// Clears `grounded` so a second request in the same tick cannot stack.
    pub fn request_jump(&self, actor: &mut Actor) -> bool {
        if !actor.alive || !actor.grounded {
            log::trace!("Jump dropped (alive={}, grounded={})", actor.alive, actor.grounded);
            return false;
        }
        actor.vel_y = self.jump_impulse;
        actor.grounded = false;
        true
    }

    pub fn integrate(&self, actor: &mut Actor, dt: f32) {
        if !actor.alive {
            return;
        }
        actor.pos.y += actor.vel_y * dt;
    }

    /// Take the physics ground-contact report for this tick
    pub fn apply_ground_report(&self, actor: &mut Actor, on_ground: bool) {
        actor.grounded = on_ground;
    }
}

/// Turns a held jump key into one request per press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpInput {
    held: bool,
}

impl JumpInput {
    /// Feed the current key state; true only on the press transition
    pub fn update(&mut self, held: bool) -> bool {
        let pressed = held && !self.held;
        self.held = held;
        pressed
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}
