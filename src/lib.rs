//! Astro Storm - a toroidal asteroid-field arcade simulation
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, collisions, entities, game state)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Top-N score store handed the final score on game over
//! - `error`: Error taxonomy shared by the modules above

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SimError};
pub use highscores::{FileScoreStore, HighScores, ScoreStore};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    use std::f32::consts::PI;

    /// Nominal frame rate the per-frame constants are expressed against
    pub const FRAMES_PER_SECOND: u64 = 60;

    /// Session defaults
    pub const LIVES: u32 = 3;
    pub const POINTS_PER_LEVEL: u64 = 550;
    /// Ship revival delay after death (~500 ms)
    pub const SHIP_RESPAWN_FRAMES: u64 = 30;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 24.0;
    pub const SHIP_MAX_SPEED: f32 = 15.0;
    pub const SHIP_FRICTION: f32 = 0.99;
    pub const SHIP_ROTATION_FRICTION: f32 = 0.95;
    pub const SHIP_MAX_ROTATION: f32 = 0.1;
    pub const SHIP_ROTATION_SPEED: f32 = 0.02;
    pub const SHIP_BOOST_FORCE: f32 = 0.15;
    pub const SHIP_KNOCKBACK_FORCE: f32 = 0.5;
    /// Invincible for 2 seconds after (re)spawn
    pub const SHIP_INVINCIBLE_FRAMES: u32 = 120;
    /// ~300 ms between shots
    pub const SHIP_SHOOT_COOLDOWN_FRAMES: u64 = 18;
    /// Ship faces up on spawn
    pub const SHIP_SPAWN_HEADING: f32 = -PI / 2.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_LIFESPAN: u32 = 70;
    pub const BULLET_RADIUS: f32 = 3.0;

    /// Asteroid defaults
    pub const ASTEROID_MAX_SPEED: f32 = 8.0;
    pub const ASTEROID_SPAWN_INTERVAL: u64 = 300;
    pub const ASTEROID_MAX_COUNT: usize = 12;
    pub const ASTEROID_INITIAL_COUNT: usize = 8;
    pub const ASTEROID_MIN_RADIUS: f32 = 30.0;
    pub const ASTEROID_MAX_RADIUS: f32 = 50.0;
    /// Smallest radius that still splits (40 -> 20 -> 10)
    pub const ASTEROID_MIN_SPLIT_RADIUS: f32 = 20.0;
    pub const ASTEROID_SPLIT_SPEED_SCALE: f32 = 1.5;
    pub const ASTEROID_SPLIT_MIN_SPEED: f32 = 1.0;
    pub const ASTEROID_SPLIT_MAX_SPEED: f32 = 10.0;
    /// Divergence of the two split children (36 degrees)
    pub const ASTEROID_SPLIT_ANGLE: f32 = PI / 5.0;
    pub const ASTEROID_MAX_SPIN: f32 = 0.03;
    pub const ASTEROID_POINTS_BASE: f32 = 100.0;
    pub const ASTEROID_POINTS_FACTOR: u64 = 15;

    /// Rocket defaults
    pub const ROCKET_RADIUS: f32 = 6.0;
    pub const ROCKET_MAX_SPEED: f32 = 7.0;
    pub const ROCKET_STEER_FORCE: f32 = 0.08;
    pub const ROCKET_LIFESPAN: u32 = 850;
    /// Warning period before a rocket launches (3 seconds)
    pub const ROCKET_ARM_FRAMES: u32 = 180;
    pub const ROCKET_SPAWN_INTERVAL: u64 = 12 * 60;
    pub const ROCKET_MIN_SPAWN_INTERVAL: u64 = 60;
    pub const ROCKET_INTERVAL_STEP: u64 = 60;
    pub const ROCKET_MAX_COUNT: usize = 5;
    pub const ROCKET_MIN_LEVEL: u32 = 2;
    pub const ROCKET_POINTS: u64 = 150;
    /// Rockets blink during their last 3 seconds
    pub const ROCKET_BLINK_FRAMES: u32 = 180;

    /// Spawn placement
    pub const MIN_SPAWN_DISTANCE: f32 = 300.0;
    pub const SPAWN_MAX_ATTEMPTS: u32 = 16;

    /// Effects
    pub const FLAME_COUNT: usize = 5;
    pub const EXPLOSION_SPARKS: usize = 100;
    pub const ROCKET_EXPLOSION_SPARKS: usize = 150;
    /// Explosion spread around the base heading (±30 degrees)
    pub const EXPLOSION_SPREAD: f32 = PI / 6.0;
    pub const SPARK_MAX_SIZE: f32 = 10.0;
    pub const SPARK_MIN_SIZE: f32 = 6.0;
    pub const SPARK_SHRINK: f32 = 0.05;
    pub const SPARK_FRICTION: f32 = 0.95;
    pub const SPARK_ROTATION_FRICTION: f32 = 0.99;
    /// Minimum magnitude of a ship explosion
    pub const SHIP_EXPLOSION_MIN_SPEED: f32 = 5.0;
    pub const POINT_INDICATOR_SIZE: f32 = 16.0;
    pub const POINT_INDICATOR_FADE: f32 = 5.0;
    pub const POINT_INDICATOR_RISE: f32 = 1.0;
    /// Entities blink with this period (frames)
    pub const BLINK_PERIOD: u64 = 10;

    /// Palette (0xRRGGBB)
    pub const SHIP_COLOR: u32 = 0x00e7ff;
    pub const BULLET_COLOR: u32 = 0x74eff8;
    pub const ASTEROID_COLOR: u32 = 0xfdc271;
    pub const ROCKET_COLOR: u32 = 0xff6b6b;
    pub const POINT_INDICATOR_COLOR: u32 = 0x00e7ff;
    pub const SHIP_FLAME_COLORS: [u32; 1] = [0x00e7ff];
    pub const ROCKET_FLAME_COLORS: [u32; 3] = [0xfb511c, 0xf9c630, 0xfcf6b4];
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Heading of a vector in radians (0 for the zero vector)
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Rescale `v` to `magnitude`, keeping its direction
///
/// A zero vector stays zero.
#[inline]
pub fn with_magnitude(v: Vec2, magnitude: f32) -> Vec2 {
    v.normalize_or_zero() * magnitude
}

/// Linear remap of `value` from `[from_lo, from_hi]` to `[to_lo, to_hi]` (unclamped)
#[inline]
pub fn remap(value: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    if (from_hi - from_lo).abs() < f32::EPSILON {
        return to_lo;
    }
    to_lo + (value - from_lo) / (from_hi - from_lo) * (to_hi - to_lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_angle_and_heading() {
        let v = from_angle(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
        assert!((heading(v) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_with_magnitude() {
        let v = with_magnitude(Vec2::new(3.0, 4.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-5);
        assert_eq!(with_magnitude(Vec2::ZERO, 10.0), Vec2::ZERO);
    }

    #[test]
    fn test_remap() {
        assert!((remap(20.0, 20.0, 80.0, 2.5, 1.2) - 2.5).abs() < 1e-6);
        assert!((remap(80.0, 20.0, 80.0, 2.5, 1.2) - 1.2).abs() < 1e-6);
        assert_eq!(remap(5.0, 1.0, 1.0, 3.0, 9.0), 3.0);
    }
}
