//! Circle-circle collision detection and elastic response
//!
//! Every collidable body is approximated by its bounding circle. Mass is
//! area-proportional (`radius²`, uniform density). This module answers only
//! the physical response; game consequences are dispatched elsewhere.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::transform::Transform;

/// Collision capability marker
///
/// Carries no state of its own: the test and the response read and write the
/// owning entity's [`Transform`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider;

impl Collider {
    pub fn intersects(&self, mine: &Transform, other: &Transform) -> bool {
        intersects(mine, other)
    }

    pub fn collide(&self, mine: &mut Transform, other: &mut Transform) {
        resolve_collision(mine, other)
    }
}

/// Mass of a body of uniform density
#[inline]
pub fn mass(t: &Transform) -> f32 {
    t.radius * t.radius
}

/// True iff the circles strictly overlap
pub fn intersects(a: &Transform, b: &Transform) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Elastic impulse along the contact normal plus positional correction
///
/// Pairs that are already separating are left untouched, as are degenerate
/// pairs (coincident centers or massless bodies).
pub fn resolve_collision(a: &mut Transform, b: &mut Transform) {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return;
    }

    let m1 = mass(a);
    let m2 = mass(b);
    if m1 <= 0.0 || m2 <= 0.0 {
        return;
    }

    let normal = delta / distance;
    let rel_vel = b.vel - a.vel;
    let rel_along_normal = rel_vel.dot(normal);

    // Moving apart already
    if rel_along_normal > 0.0 {
        return;
    }

    let impulse: Vec2 = normal * (2.0 * rel_along_normal / (1.0 / m1 + 1.0 / m2));
    a.vel += impulse / m1;
    b.vel -= impulse / m2;

    // Push apart in proportion to the other body's mass share
    let overlap = a.radius + b.radius - distance;
    if overlap > 0.0 {
        let total = m1 + m2;
        a.pos -= normal * overlap * (m2 / total);
        b.pos += normal * overlap * (m1 / total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(x: f32, y: f32, vx: f32, vy: f32, r: f32) -> Transform {
        Transform::new(Vec2::new(x, y), r).with_velocity(Vec2::new(vx, vy))
    }

    fn momentum(a: &Transform, b: &Transform) -> Vec2 {
        a.vel * mass(a) + b.vel * mass(b)
    }

    #[test]
    fn test_intersects_strict() {
        let a = body(0.0, 0.0, 0.0, 0.0, 10.0);
        let touching = body(20.0, 0.0, 0.0, 0.0, 10.0);
        let overlapping = body(19.0, 0.0, 0.0, 0.0, 10.0);
        assert!(!intersects(&a, &touching));
        assert!(intersects(&a, &overlapping));
        assert!(Collider.intersects(&overlapping, &a));
    }

    #[test]
    fn test_head_on_equal_masses_swap_velocities() {
        let mut a = body(0.0, 0.0, 2.0, 0.0, 10.0);
        let mut b = body(19.0, 0.0, -2.0, 0.0, 10.0);
        resolve_collision(&mut a, &mut b);
        assert!((a.vel.x + 2.0).abs() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
        // Overlap removed symmetrically
        assert!((a.pos.distance(b.pos) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_separating_pair_untouched() {
        let mut a = body(0.0, 0.0, -1.0, 0.0, 10.0);
        let mut b = body(15.0, 0.0, 1.0, 0.0, 10.0);
        let (a0, b0) = (a.clone(), b.clone());
        resolve_collision(&mut a, &mut b);
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_coincident_centers_noop() {
        let mut a = body(5.0, 5.0, 1.0, 0.0, 10.0);
        let mut b = body(5.0, 5.0, -1.0, 0.0, 10.0);
        let (a0, b0) = (a.clone(), b.clone());
        resolve_collision(&mut a, &mut b);
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_heavier_body_moves_less() {
        let mut big = body(0.0, 0.0, 0.0, 0.0, 40.0);
        let mut small = body(45.0, 0.0, -3.0, 0.0, 10.0);
        resolve_collision(&mut big, &mut small);
        assert!(big.vel.x < 0.0);
        assert!(small.vel.x > 0.0);
        assert!(big.vel.length() < small.vel.length());
        // Push-apart displacement weighted by the other body's mass
        assert!(big.pos.x.abs() < (small.pos.x - 45.0).abs());
    }

    proptest! {
        #[test]
        fn prop_intersects_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.0f32..60.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.0f32..60.0,
        ) {
            let a = body(ax, ay, 0.0, 0.0, ar);
            let b = body(bx, by, 0.0, 0.0, br);
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }

        #[test]
        fn prop_momentum_conserved(
            dx in 1.0f32..30.0, dy in -30.0f32..30.0,
            avx in -8.0f32..8.0, avy in -8.0f32..8.0,
            bvx in -8.0f32..8.0, bvy in -8.0f32..8.0,
            ar in 5.0f32..50.0, br in 5.0f32..50.0,
        ) {
            let mut a = body(0.0, 0.0, avx, avy, ar);
            let mut b = body(dx, dy, bvx, bvy, br);
            let before = momentum(&a, &b);
            let scale = 1.0 + a.vel.length() * mass(&a) + b.vel.length() * mass(&b);
            resolve_collision(&mut a, &mut b);
            let after = momentum(&a, &b);
            prop_assert!((after - before).length() / scale < 1e-3);
        }

        #[test]
        fn prop_kinetic_energy_preserved_when_approaching(
            dx in 1.0f32..30.0,
            avx in 0.5f32..8.0,
            bvx in -8.0f32..-0.5,
            ar in 5.0f32..50.0, br in 5.0f32..50.0,
        ) {
            let mut a = body(0.0, 0.0, avx, 0.0, ar);
            let mut b = body(dx, 0.0, bvx, 0.0, br);
            let energy = |a: &Transform, b: &Transform| {
                mass(a) * a.vel.length_squared() + mass(b) * b.vel.length_squared()
            };
            let before = energy(&a, &b);
            resolve_collision(&mut a, &mut b);
            let after = energy(&a, &b);
            prop_assert!((after - before).abs() / before < 1e-3);
        }
    }
}
