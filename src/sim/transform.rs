//! Transform capability: kinematic state and per-frame integration
//!
//! One call to [`Transform::integrate`] advances exactly one frame
//! (semi-implicit Euler, unit timestep), then wraps the position onto the
//! torus using the body's own radius as margin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Dimensions of the toroidal world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Remap `pos` into `[-margin, width + margin] x [-margin, height + margin]`
    ///
    /// Leaving one edge re-enters at the opposite edge; velocity is untouched.
    pub fn wrap(&self, mut pos: Vec2, margin: f32) -> Vec2 {
        if pos.x < -margin {
            pos.x = self.width + margin;
        } else if pos.x > self.width + margin {
            pos.x = -margin;
        }

        if pos.y < -margin {
            pos.y = self.height + margin;
        } else if pos.y > self.height + margin {
            pos.y = -margin;
        }
        pos
    }
}

/// Position, velocity and heading of a physically simulated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Accumulated force for the current frame (cleared by `integrate`)
    pub acc: Vec2,
    /// Heading in radians
    pub heading: f32,
    /// Angular velocity in radians per frame
    pub rotation: f32,
    /// Linear friction multiplier in [0, 1] (1 = frictionless)
    pub friction: f32,
    /// Angular friction multiplier in [0, 1]
    pub rotation_friction: f32,
    pub max_speed: f32,
    pub max_rotation: f32,
    /// Collision radius (also the wrap margin)
    pub radius: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            heading: 0.0,
            rotation: 0.0,
            friction: 1.0,
            rotation_friction: 1.0,
            max_speed: f32::INFINITY,
            max_rotation: crate::consts::SHIP_MAX_ROTATION,
            radius: 0.0,
        }
    }
}

impl Transform {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius: radius.max(0.0),
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    pub fn with_rotation_friction(mut self, friction: f32) -> Self {
        self.rotation_friction = friction.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_max_rotation(mut self, max_rotation: f32) -> Self {
        self.max_rotation = max_rotation;
        self
    }

    /// Advance one frame and wrap onto the torus
    pub fn integrate(&mut self, bounds: &Bounds) {
        self.rotation *= self.rotation_friction;
        self.rotation = self.rotation.clamp(-self.max_rotation, self.max_rotation);
        self.heading += self.rotation;

        self.vel += self.acc;
        self.vel *= self.friction;
        self.vel = self.vel.clamp_length_max(self.max_speed);
        self.pos += self.vel;

        self.acc = Vec2::ZERO;
        self.pos = bounds.wrap(self.pos, self.radius);
    }

    /// Accumulate a force for the next integration step
    pub fn add_force(&mut self, force: Vec2) {
        self.acc += force;
    }

    /// Instantaneous velocity change
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse;
    }

    pub fn add_rotation(&mut self, delta: f32) {
        self.rotation += delta;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.heading = heading;
    }

    pub fn set_rotation_speed(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
