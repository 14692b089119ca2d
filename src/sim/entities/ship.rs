//! The player's ship
//!
//! Death is not a timer callback: the ship records the frame at which it
//! revives and checks it during its own update.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::Bullet;
use crate::consts::{FLAME_COUNT, SHIP_FLAME_COLORS, SHIP_SPAWN_HEADING};
use crate::error::SimError;
use crate::from_angle;
use crate::sim::collision::Collider;
use crate::sim::entity::{Behavior, Body, Entity, EntityId, FrameContext, Modules};
use crate::sim::flame::Flammable;
use crate::sim::transform::{Bounds, Transform};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ship {
    pub dead: bool,
    /// Frames of invincibility left
    pub invincible_frames: u32,
    /// Frame at which a dead ship revives
    pub respawn_at: Option<u64>,
    /// Frame of the last shot (for the cooldown)
    pub last_shot: Option<u64>,
    /// Invincibility granted on each revival
    spawn_invincibility: u32,
}

impl Ship {
    /// Ship at the world center facing up, invincible for the spawn window
    pub fn spawn(bounds: &Bounds, tuning: &Tuning) -> Entity {
        let t = &tuning.ship;
        let ship = Ship {
            invincible_frames: t.invincible_frames,
            spawn_invincibility: t.invincible_frames,
            ..Default::default()
        };

        Entity::new(Body::Ship(ship), 0)
            .with(
                Transform::new(bounds.center(), t.radius)
                    .with_heading(SHIP_SPAWN_HEADING)
                    .with_friction(t.friction)
                    .with_rotation_friction(t.rotation_friction)
                    .with_max_rotation(t.max_rotation)
                    .with_max_speed(t.max_speed),
            )
            .with(Collider)
            .with(Flammable::new(FLAME_COUNT, &SHIP_FLAME_COLORS))
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_frames > 0
    }

    /// Whether a hit would destroy the ship right now
    pub fn is_vulnerable(&self) -> bool {
        !self.dead && !self.is_invincible()
    }

    pub fn die(&mut self, respawn_at: u64) {
        self.dead = true;
        self.respawn_at = Some(respawn_at);
    }

    fn revive(&mut self, transform: &mut Transform, bounds: &Bounds) {
        self.dead = false;
        self.respawn_at = None;
        self.invincible_frames = self.spawn_invincibility;
        transform.set_position(bounds.center());
        transform.set_heading(SHIP_SPAWN_HEADING);
        transform.set_velocity(Vec2::ZERO);
        transform.set_rotation_speed(0.0);
        transform.acc = Vec2::ZERO;
    }

    /// Turn input
    pub fn add_rotation(entity: &mut Entity, delta: f32) -> Result<(), SimError> {
        if Self::is_dead(entity) {
            return Ok(());
        }
        entity.transform_mut()?.add_rotation(delta);
        Ok(())
    }

    /// Thrust along the heading; returns the exhaust flames
    pub fn boost(
        entity: &mut Entity,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) -> Result<Vec<Entity>, SimError> {
        if Self::is_dead(entity) {
            return Ok(Vec::new());
        }

        let transform = entity.transform_mut()?;
        transform.add_force(from_angle(transform.heading) * tuning.ship.boost_force);
        let behind = from_angle(transform.heading + std::f32::consts::PI);
        let exhaust = transform.pos + behind * transform.radius * 0.9;
        let (vel, heading) = (transform.vel, transform.heading);

        Ok(entity.module::<Flammable>()?.emit(exhaust, vel, heading, rng))
    }

    /// Fire a bullet if the cooldown allows it, with recoil
    pub fn shoot(
        entity: &mut Entity,
        frame: u64,
        tuning: &Tuning,
    ) -> Result<Option<Entity>, SimError> {
        let cooldown = tuning.ship.shoot_cooldown_frames;
        let id = entity.id();
        let Some(ship) = entity.as_ship_mut() else {
            return Err(SimError::EntityNotFound(id));
        };
        if ship.dead {
            return Ok(None);
        }
        if ship.last_shot.is_some_and(|last| frame.saturating_sub(last) < cooldown) {
            return Ok(None);
        }
        ship.last_shot = Some(frame);

        let transform = entity.transform_mut()?;
        let aim = from_angle(transform.heading);
        transform.add_force(-aim * tuning.ship.knockback_force);

        let pos = transform.pos + aim * transform.radius;
        let vel = aim * tuning.bullet.speed + transform.vel;
        Ok(Some(Bullet::spawn(pos, vel, tuning)))
    }

    fn is_dead(entity: &Entity) -> bool {
        entity.as_ship().is_none_or(|ship| ship.dead)
    }
}

impl Behavior for Ship {
    fn update(
        &mut self,
        id: EntityId,
        modules: &mut Modules,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), SimError> {
        if self.dead {
            if self.respawn_at.is_some_and(|at| ctx.frame >= at) {
                self.revive(modules.require_mut::<Transform>(id)?, &ctx.bounds);
                log::debug!("ship {} revived at frame {}", id, ctx.frame);
            }
            return Ok(());
        }

        modules.update_all(&ctx.bounds);
        self.invincible_frames = self.invincible_frames.saturating_sub(1);
        Ok(())
    }
}
