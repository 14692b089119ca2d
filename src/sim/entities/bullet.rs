//! Ship bullets

use glam::Vec2;

use crate::error::SimError;
use crate::sim::collision::Collider;
use crate::sim::entity::{Behavior, Body, Entity, EntityId, FrameContext, Modules};
use crate::sim::transform::Transform;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    /// Frames left before the bullet fizzles out
    pub lifespan: u32,
}

impl Bullet {
    pub fn new(lifespan: u32) -> Self {
        Self { lifespan }
    }

    /// Frictionless bullet entity flying at `vel`
    pub fn spawn(pos: Vec2, vel: Vec2, tuning: &Tuning) -> Entity {
        Entity::new(Body::Bullet(Bullet::new(tuning.bullet.lifespan)), 0)
            .with(Transform::new(pos, tuning.bullet.radius).with_velocity(vel))
            .with(Collider)
    }
}

impl Behavior for Bullet {
    fn update(
        &mut self,
        _id: EntityId,
        modules: &mut Modules,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), SimError> {
        modules.update_all(&ctx.bounds);
        self.lifespan = self.lifespan.saturating_sub(1);
        Ok(())
    }

    fn should_remove(&self, _modules: &Modules) -> bool {
        self.lifespan == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::transform::Bounds;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_bullet_expires_after_lifespan() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut ctx = FrameContext {
            frame: 0,
            bounds: Bounds::new(800.0, 600.0),
            tuning: &tuning,
            rng: &mut rng,
            target: None,
            spawned: Vec::new(),
        };

        let mut bullet = Bullet::spawn(Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0), &tuning);
        for _ in 0..tuning.bullet.lifespan - 1 {
            bullet.update(&mut ctx).unwrap();
            assert!(!bullet.should_remove());
        }
        bullet.update(&mut ctx).unwrap();
        assert!(bullet.should_remove());
    }

    #[test]
    fn test_bullet_flies_straight() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut ctx = FrameContext {
            frame: 0,
            bounds: Bounds::new(800.0, 600.0),
            tuning: &tuning,
            rng: &mut rng,
            target: None,
            spawned: Vec::new(),
        };
        let mut bullet = Bullet::spawn(Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0), &tuning);
        for _ in 0..5 {
            bullet.update(&mut ctx).unwrap();
        }
        let t = bullet.transform().unwrap();
        assert_eq!(t.pos, Vec2::new(150.0, 100.0));
        assert_eq!(t.vel, Vec2::new(10.0, 0.0));
    }
}
