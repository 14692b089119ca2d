//! Spawn placement away from the ship

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::transform::Bounds;
use crate::tuning::SpawnTuning;

/// Random point at least `min_distance` from `ship`
///
/// Rejection-sampled with a bounded budget. When every attempt lands too
/// close, the point diametrically opposite the ship on the torus is used
/// instead. Without a live ship any point is accepted.
pub fn spawn_position(
    bounds: &Bounds,
    ship: Option<Vec2>,
    tuning: &SpawnTuning,
    rng: &mut Pcg32,
) -> Vec2 {
    let Some(ship) = ship else {
        return random_point(bounds, rng);
    };

    for _ in 0..tuning.max_attempts {
        let candidate = random_point(bounds, rng);
        if candidate.distance(ship) >= tuning.min_distance {
            return candidate;
        }
    }

    let fallback = opposite_point(bounds, ship);
    log::debug!(
        "spawn placement fell back to {:?} after {} attempts",
        fallback,
        tuning.max_attempts
    );
    fallback
}

fn random_point(bounds: &Bounds, rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(0.0..bounds.width.max(1.0)),
        rng.random_range(0.0..bounds.height.max(1.0)),
    )
}

/// Farthest point from `pos` on the torus
fn opposite_point(bounds: &Bounds, pos: Vec2) -> Vec2 {
    let w = bounds.width.max(1.0);
    let h = bounds.height.max(1.0);
    Vec2::new((pos.x + w / 2.0).rem_euclid(w), (pos.y + h / 2.0).rem_euclid(h))
}
