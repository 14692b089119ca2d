//! Homing rockets
//!
//! A fresh rocket sits in place showing a warning while it turns toward the
//! ship. Once armed it launches: it moves, sheds flames and can collide.

use std::f32::consts::PI;

use glam::Vec2;

use crate::consts::{FLAME_COUNT, ROCKET_BLINK_FRAMES, ROCKET_FLAME_COLORS};
use crate::error::SimError;
use crate::sim::collision::Collider;
use crate::sim::entity::{Behavior, Body, Entity, EntityId, FrameContext, Modules};
use crate::sim::flame::Flammable;
use crate::sim::transform::Transform;
use crate::tuning::Tuning;
use crate::{from_angle, heading, with_magnitude};

#[derive(Debug, Clone, PartialEq)]
pub struct Rocket {
    pub lifespan: u32,
    /// Launched: moving and collidable
    pub armed: bool,
    /// Frames since spawn
    pub age: u32,
    arm_frames: u32,
    steer_force: f32,
}

impl Rocket {
    pub fn spawn(pos: Vec2, tuning: &Tuning) -> Entity {
        let t = &tuning.rocket;
        let rocket = Rocket {
            lifespan: t.lifespan,
            armed: false,
            age: 0,
            arm_frames: t.arm_frames,
            steer_force: t.steer_force,
        };

        Entity::new(Body::Rocket(rocket), 2)
            .with(Transform::new(pos, t.radius).with_max_speed(t.max_speed))
            .with(Collider)
            .with(Flammable::new(FLAME_COUNT, &ROCKET_FLAME_COLORS))
    }

    /// Blinks during its final seconds
    pub fn is_expiring(&self) -> bool {
        self.lifespan < ROCKET_BLINK_FRAMES
    }

    fn steer(&self, transform: &mut Transform, target: Vec2) {
        let desired = with_magnitude(target - transform.pos, transform.max_speed);
        let steer = (desired - transform.vel).clamp_length_max(self.steer_force);
        transform.apply_impulse(steer);
    }
}

impl Behavior for Rocket {
    fn update(
        &mut self,
        id: EntityId,
        modules: &mut Modules,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), SimError> {
        if let Some(target) = ctx.target {
            self.steer(modules.require_mut::<Transform>(id)?, target);
        }

        if self.armed {
            modules.update_all(&ctx.bounds);

            let transform = modules.require::<Transform>(id)?;
            let dir = heading(transform.vel);
            let exhaust = transform.pos + from_angle(dir + PI) * (transform.radius + 2.0);
            let vel = transform.vel;
            let flames = modules.require::<Flammable>(id)?.emit(exhaust, vel, dir, ctx.rng);
            ctx.spawned.extend(flames);
        }

        self.lifespan = self.lifespan.saturating_sub(1);
        self.age = self.age.saturating_add(1);
        if !self.armed && self.age >= self.arm_frames {
            self.armed = true;
            log::debug!("rocket {} armed", id);
        }
        Ok(())
    }

    fn should_remove(&self, _modules: &Modules) -> bool {
        self.lifespan == 0
    }
}
