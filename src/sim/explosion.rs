//! Explosion burst generator

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entities::Spark;
use super::entity::Entity;
use crate::consts::{EXPLOSION_SPREAD, SPARK_MAX_SIZE, SPARK_MIN_SIZE};
use crate::{from_angle, heading};

/// Parameters of one burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    /// Base velocity; sparks fan out around its heading
    pub vel: Vec2,
    pub sparks: usize,
    pub color: u32,
}

impl Explosion {
    pub fn new(pos: Vec2, vel: Vec2, sparks: usize, color: u32) -> Self {
        Self { pos, vel, sparks, color }
    }

    /// Build the spark entities
    ///
    /// Each spark heads within ±30° of the base heading. Larger bursts throw
    /// sparks faster, and sparks whose speed strays furthest from the base
    /// speed come out smallest.
    pub fn sparks(&self, rng: &mut Pcg32) -> Vec<Entity> {
        let base_heading = heading(self.vel);
        let base_speed = self.vel.length();
        let speed_scale = self.sparks as f32 / 10.0 * 0.7;

        (0..self.sparks)
            .map(|_| {
                let angle = base_heading + rng.random_range(-EXPLOSION_SPREAD..EXPLOSION_SPREAD);
                let speed = rng.random_range(0.5..3.0) * speed_scale;
                let spread = (speed - base_speed).abs() / base_speed.max(f32::EPSILON);
                let deviation = spread.min(1.0);
                let size = SPARK_MAX_SIZE - (SPARK_MAX_SIZE - SPARK_MIN_SIZE) * deviation;

                Spark::spawn(
                    self.pos,
                    from_angle(angle) * speed,
                    size,
                    self.color,
                    rng.random_range(0.01..0.1),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_spark_count_and_origin() {
        let mut rng = Pcg32::seed_from_u64(11);
        let burst = Explosion::new(Vec2::new(40.0, 60.0), Vec2::new(5.0, 0.0), 100, 0xfdc271);
        let sparks = burst.sparks(&mut rng);
        assert_eq!(sparks.len(), 100);
        for spark in &sparks {
            assert_eq!(spark.kind(), EntityKind::ExplosionSpark);
            assert_eq!(spark.transform().unwrap().pos, Vec2::new(40.0, 60.0));
            assert!(!spark.can_collide());
        }
    }

    #[test]
    fn test_zero_sparks() {
        let mut rng = Pcg32::seed_from_u64(11);
        assert!(Explosion::new(Vec2::ZERO, Vec2::X, 0, 0).sparks(&mut rng).is_empty());
    }

    proptest! {
        #[test]
        fn prop_sparks_within_spread(
            seed in any::<u64>(),
            angle in -3.0f32..3.0,
            speed in 1.0f32..8.0,
            count in 1usize..60,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let base = from_angle(angle) * speed;
            let burst = Explosion::new(Vec2::ZERO, base, count, 0xffffff);
            for spark in burst.sparks(&mut rng) {
                let t = spark.transform().unwrap();
                // Angle between spark velocity and base velocity
                let cos = t.vel.normalize().dot(base.normalize());
                prop_assert!(cos >= EXPLOSION_SPREAD.cos() - 1e-4);
                prop_assert!(t.radius >= SPARK_MIN_SIZE - 1e-4);
                prop_assert!(t.radius <= SPARK_MAX_SIZE + 1e-4);
            }
        }
    }
}
