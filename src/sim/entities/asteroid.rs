//! Asteroids: drifting rocks that split in two when shot

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{ASTEROID_POINTS_BASE, ASTEROID_POINTS_FACTOR};
use crate::sim::collision::Collider;
use crate::sim::entity::{Behavior, Body, Entity};
use crate::sim::transform::Transform;
use crate::tuning::Tuning;
use crate::{from_angle, heading, remap};

/// Asteroid state; the radius lives on the transform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asteroid {
    /// Silhouette vertex distances as multiples of the radius (render only)
    pub outline: Vec<f32>,
}

impl Asteroid {
    /// Build an asteroid; without `vel` it drifts in a random direction,
    /// smaller rocks faster
    pub fn spawn(
        pos: Vec2,
        radius: f32,
        vel: Option<Vec2>,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) -> Entity {
        let t = &tuning.asteroid;
        let vel = vel.unwrap_or_else(|| {
            let speed = remap(radius, 20.0, 80.0, 2.5, 1.2);
            from_angle(rng.random_range(0.0..TAU)) * speed
        });
        let spin = if t.max_spin > 0.0 {
            rng.random_range(-t.max_spin..t.max_spin)
        } else {
            0.0
        };

        let vertices = remap(radius, 20.0, 80.0, 20.0, 25.0).floor().max(3.0) as usize;
        let outline = (0..vertices).map(|_| rng.random_range(1.0..1.3)).collect();

        Entity::new(Body::Asteroid(Asteroid { outline }), 1)
            .with(
                Transform::new(pos, radius)
                    .with_velocity(vel)
                    .with_rotation(spin)
                    .with_max_speed(t.max_speed),
            )
            .with(Collider)
    }

    /// Score for destroying an asteroid of this radius
    pub fn points(radius: f32) -> u64 {
        if radius <= 0.0 {
            return 0;
        }
        (ASTEROID_POINTS_BASE / radius).floor() as u64 * ASTEROID_POINTS_FACTOR
    }

    /// Two half-size children diverging from the combined velocity
    ///
    /// The children head along `asteroid.vel + impact_vel` rotated by
    /// ±`split_angle`, at the parent's speed scaled up and clamped. Each is
    /// offset by its own radius along its heading. Asteroids smaller than the
    /// minimum split radius yield nothing.
    pub fn split(
        asteroid: &Transform,
        impact_vel: Vec2,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) -> Vec<Entity> {
        let t = &tuning.asteroid;
        if asteroid.radius < t.min_split_radius {
            return Vec::new();
        }

        let child_radius = asteroid.radius / 2.0;
        let speed = (asteroid.speed() * t.split_speed_scale)
            .max(t.split_min_speed)
            .min(t.split_max_speed);

        let combined = asteroid.vel + impact_vel;
        let base = if combined.length_squared() > f32::EPSILON {
            heading(combined)
        } else {
            rng.random_range(0.0..TAU)
        };

        [1.0f32, -1.0]
            .into_iter()
            .map(|side| {
                let dir = from_angle(base + side * t.split_angle);
                let pos = asteroid.pos + dir * child_radius;
                Asteroid::spawn(pos, child_radius, Some(dir * speed), tuning, rng)
            })
            .collect()
    }
}

impl Behavior for Asteroid {}
