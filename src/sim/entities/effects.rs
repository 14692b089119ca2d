//! Short-lived visual entities: exhaust flames, explosion sparks and
//! floating score indicators
//!
//! None of them collide; each one shrinks or fades until it removes itself.

use glam::Vec2;

use crate::consts::{
    POINT_INDICATOR_COLOR, POINT_INDICATOR_FADE, POINT_INDICATOR_RISE, POINT_INDICATOR_SIZE,
    SPARK_FRICTION, SPARK_ROTATION_FRICTION, SPARK_SHRINK,
};
use crate::error::SimError;
use crate::sim::entity::{Behavior, Body, Entity, EntityId, FrameContext, Modules};
use crate::sim::transform::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct Flame {
    pub color: u32,
    /// Radius lost per frame
    pub shrink: f32,
}

impl Flame {
    pub fn spawn(
        pos: Vec2,
        vel: Vec2,
        heading: f32,
        size: f32,
        shrink: f32,
        color: u32,
    ) -> Entity {
        let transform = Transform::new(pos, size).with_velocity(vel).with_heading(heading);
        Entity::new(Body::Flame(Flame { color, shrink }), 0).with(transform)
    }
}

impl Behavior for Flame {
    fn update(
        &mut self,
        id: EntityId,
        modules: &mut Modules,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), SimError> {
        modules.update_all(&ctx.bounds);
        let transform = modules.require_mut::<Transform>(id)?;
        transform.set_radius(transform.radius - self.shrink);
        Ok(())
    }

    fn should_remove(&self, modules: &Modules) -> bool {
        modules.get::<Transform>().is_none_or(|t| t.radius <= 0.0)
    }
}

/// Explosion debris
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub color: u32,
}

impl Spark {
    pub fn spawn(pos: Vec2, vel: Vec2, radius: f32, color: u32, rotation: f32) -> Entity {
        Entity::new(Body::Spark(Spark { color }), 100).with(
            Transform::new(pos, radius)
                .with_velocity(vel)
                .with_rotation(rotation)
                .with_friction(SPARK_FRICTION)
                .with_rotation_friction(SPARK_ROTATION_FRICTION),
        )
    }
}

impl Behavior for Spark {
    fn update(
        &mut self,
        id: EntityId,
        modules: &mut Modules,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), SimError> {
        modules.update_all(&ctx.bounds);
        let transform = modules.require_mut::<Transform>(id)?;
        transform.set_radius(transform.radius - SPARK_SHRINK);
        Ok(())
    }

    fn should_remove(&self, modules: &Modules) -> bool {
        modules.get::<Transform>().is_none_or(|t| t.radius <= 0.0)
    }
}

/// Floating "+N" label that rises and fades out
///
/// Not physically simulated, so it tracks its own position.
#[derive(Debug, Clone, PartialEq)]
pub struct PointIndicator {
    pub text: String,
    pub pos: Vec2,
    /// 0..=255
    pub opacity: f32,
    pub size: f32,
    pub color: u32,
}

impl PointIndicator {
    pub fn new(text: &str, pos: Vec2) -> Self {
        Self {
            text: text.to_string(),
            pos,
            opacity: 255.0,
            size: POINT_INDICATOR_SIZE,
            color: POINT_INDICATOR_COLOR,
        }
    }

    /// Indicator entity announcing `points` at `pos`
    pub fn spawn(points: u64, pos: Vec2) -> Entity {
        Entity::new(Body::PointIndicator(Self::new(&format!("+{points}"), pos)), 100)
    }
}

impl Behavior for PointIndicator {
    fn update(
        &mut self,
        _id: EntityId,
        _modules: &mut Modules,
        _ctx: &mut FrameContext<'_>,
    ) -> Result<(), SimError> {
        self.opacity -= POINT_INDICATOR_FADE;
        self.pos.y -= POINT_INDICATOR_RISE;
        Ok(())
    }

    fn should_remove(&self, _modules: &Modules) -> bool {
        self.opacity <= 0.0
    }
}
