//! Flame-emission capability
//!
//! Ships and rockets carry a [`Flammable`] that sheds short-lived flame
//! particles behind them while thrusting.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entities::Flame;
use super::entity::Entity;
use crate::from_angle;

/// Velocity share a flame inherits from its emitter
const FLAME_VELOCITY_SHARE: f32 = 1.0 / 15.0;
/// Maximum distance of a flame from the emission point
const FLAME_SCATTER: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Flammable {
    /// Flames per emission
    pub count: usize,
    /// Palette (0xRRGGBB), one picked at random per flame
    pub colors: Vec<u32>,
}

impl Flammable {
    pub fn new(count: usize, colors: &[u32]) -> Self {
        Self {
            count,
            colors: colors.to_vec(),
        }
    }

    /// Build `count` flames scattered in a 120° cone behind `heading`
    pub fn emit(&self, pos: Vec2, vel: Vec2, heading: f32, rng: &mut Pcg32) -> Vec<Entity> {
        (0..self.count)
            .map(|_| {
                let offset_angle = rng.random_range(-PI / 3.0..PI / 3.0) + heading + PI;
                let offset = from_angle(offset_angle) * rng.random_range(0.0..FLAME_SCATTER);
                let color = if self.colors.is_empty() {
                    0xffffff
                } else {
                    self.colors[rng.random_range(0..self.colors.len())]
                };

                Flame::spawn(
                    pos + offset,
                    vel * FLAME_VELOCITY_SHARE,
                    heading + rng.random_range(-0.3..0.3),
                    rng.random_range(2.0..6.0),
                    rng.random_range(0.05..0.2),
                    color,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use rand::SeedableRng;

    #[test]
    fn test_emit_behind_heading() {
        let mut rng = Pcg32::seed_from_u64(3);
        let flammable = Flammable::new(5, &[0x00e7ff]);
        let flames = flammable.emit(Vec2::new(100.0, 100.0), Vec2::new(6.0, 0.0), 0.0, &mut rng);

        assert_eq!(flames.len(), 5);
        for flame in &flames {
            assert_eq!(flame.kind(), EntityKind::Flame);
            let t = flame.transform().unwrap();
            // Heading 0 means flames scatter toward -x
            assert!(t.pos.x <= 100.0 + 1e-3);
            assert!(t.pos.distance(Vec2::new(100.0, 100.0)) <= FLAME_SCATTER);
            assert!((t.vel.x - 0.4).abs() < 1e-5);
            assert!(t.radius >= 2.0 && t.radius < 6.0);
        }
    }

    #[test]
    fn test_empty_palette_falls_back_to_white() {
        let mut rng = Pcg32::seed_from_u64(3);
        let flames = Flammable::new(2, &[]).emit(Vec2::ZERO, Vec2::ZERO, 0.0, &mut rng);
        assert_eq!(flames.len(), 2);
    }
}
