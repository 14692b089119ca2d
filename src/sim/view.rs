//! Read-only snapshot of an entity for the render consumer

use glam::Vec2;
use serde::Serialize;

use super::entity::{Body, Entity, EntityId, EntityKind};
use crate::consts::{ASTEROID_COLOR, BLINK_PERIOD, BULLET_COLOR, ROCKET_COLOR, SHIP_COLOR};

/// Everything a renderer needs to draw one entity this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView<'a> {
    pub id: EntityId,
    pub kind: EntityKind,
    pub z_order: i32,
    pub pos: Vec2,
    pub radius: f32,
    pub heading: f32,
    /// 0xRRGGBB
    pub color: u32,
    /// 0..=255
    pub opacity: f32,
    /// Draw dimmed this frame
    pub blink: bool,
    /// Pre-launch warning (rockets)
    pub warning: bool,
    pub label: Option<&'a str>,
    /// Silhouette vertex offsets (asteroids)
    pub outline: &'a [f32],
}

impl<'a> EntityView<'a> {
    pub fn of(entity: &'a Entity, frame: u64) -> Self {
        let (pos, radius, heading) = match entity.transform() {
            Ok(t) => (t.pos, t.radius, t.heading),
            Err(_) => (Vec2::ZERO, 0.0, 0.0),
        };
        let blinking = frame % BLINK_PERIOD < BLINK_PERIOD / 2;

        let mut view = Self {
            id: entity.id(),
            kind: entity.kind(),
            z_order: entity.z_order(),
            pos,
            radius,
            heading,
            color: 0xffffff,
            opacity: 255.0,
            blink: false,
            warning: false,
            label: None,
            outline: &[],
        };

        match entity.body() {
            Body::Ship(ship) => {
                view.color = SHIP_COLOR;
                view.blink = ship.is_invincible() && blinking;
                // Hidden while waiting to respawn
                if ship.dead {
                    view.opacity = 0.0;
                }
            }
            Body::Asteroid(asteroid) => {
                view.color = ASTEROID_COLOR;
                view.outline = asteroid.outline.as_slice();
            }
            Body::Bullet(_) => view.color = BULLET_COLOR,
            Body::Rocket(rocket) => {
                view.color = ROCKET_COLOR;
                view.warning = !rocket.armed;
                view.blink = rocket.is_expiring() && blinking;
                // Rockets point along their velocity
                if let Ok(t) = entity.transform() {
                    view.heading = crate::heading(t.vel);
                }
            }
            Body::Flame(flame) => view.color = flame.color,
            Body::Spark(spark) => view.color = spark.color,
            Body::PointIndicator(indicator) => {
                view.pos = indicator.pos;
                view.radius = indicator.size;
                view.color = indicator.color;
                view.opacity = indicator.opacity.max(0.0);
                view.label = Some(indicator.text.as_str());
            }
        }
        view
    }
}
