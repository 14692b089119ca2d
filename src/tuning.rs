//! Game balance tunables
//!
//! Read once at initialization (optionally from a JSON override file) and
//! never reloaded while a session runs. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Session-level rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Lives at the start of a session
    pub lives: u32,
    /// Score span of one level
    pub points_per_level: u64,
    /// Frames between ship death and revival
    pub respawn_frames: u64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            lives: LIVES,
            points_per_level: POINTS_PER_LEVEL,
            respawn_frames: SHIP_RESPAWN_FRAMES,
        }
    }
}

/// Player ship handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    pub radius: f32,
    pub max_speed: f32,
    pub friction: f32,
    pub rotation_friction: f32,
    pub max_rotation: f32,
    /// Rotation added per frame while a turn key is held
    pub rotation_speed: f32,
    pub boost_force: f32,
    pub knockback_force: f32,
    pub invincible_frames: u32,
    pub shoot_cooldown_frames: u64,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            radius: SHIP_RADIUS,
            max_speed: SHIP_MAX_SPEED,
            friction: SHIP_FRICTION,
            rotation_friction: SHIP_ROTATION_FRICTION,
            max_rotation: SHIP_MAX_ROTATION,
            rotation_speed: SHIP_ROTATION_SPEED,
            boost_force: SHIP_BOOST_FORCE,
            knockback_force: SHIP_KNOCKBACK_FORCE,
            invincible_frames: SHIP_INVINCIBLE_FRAMES,
            shoot_cooldown_frames: SHIP_SHOOT_COOLDOWN_FRAMES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub speed: f32,
    pub lifespan: u32,
    pub radius: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            speed: BULLET_SPEED,
            lifespan: BULLET_LIFESPAN,
            radius: BULLET_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidTuning {
    pub max_speed: f32,
    pub spawn_interval: u64,
    pub max_count: usize,
    pub initial_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_split_radius: f32,
    pub split_speed_scale: f32,
    pub split_min_speed: f32,
    pub split_max_speed: f32,
    /// Divergence angle of split children (radians)
    pub split_angle: f32,
    pub max_spin: f32,
}

impl Default for AsteroidTuning {
    fn default() -> Self {
        Self {
            max_speed: ASTEROID_MAX_SPEED,
            spawn_interval: ASTEROID_SPAWN_INTERVAL,
            max_count: ASTEROID_MAX_COUNT,
            initial_count: ASTEROID_INITIAL_COUNT,
            min_radius: ASTEROID_MIN_RADIUS,
            max_radius: ASTEROID_MAX_RADIUS,
            min_split_radius: ASTEROID_MIN_SPLIT_RADIUS,
            split_speed_scale: ASTEROID_SPLIT_SPEED_SCALE,
            split_min_speed: ASTEROID_SPLIT_MIN_SPEED,
            split_max_speed: ASTEROID_SPLIT_MAX_SPEED,
            split_angle: ASTEROID_SPLIT_ANGLE,
            max_spin: ASTEROID_MAX_SPIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketTuning {
    pub radius: f32,
    pub max_speed: f32,
    pub steer_force: f32,
    pub lifespan: u32,
    /// Grace period before the rocket starts homing and can collide
    pub arm_frames: u32,
    pub spawn_interval: u64,
    pub min_spawn_interval: u64,
    /// Spawn interval reduction per level
    pub interval_step: u64,
    pub max_count: usize,
    pub min_level: u32,
}

impl Default for RocketTuning {
    fn default() -> Self {
        Self {
            radius: ROCKET_RADIUS,
            max_speed: ROCKET_MAX_SPEED,
            steer_force: ROCKET_STEER_FORCE,
            lifespan: ROCKET_LIFESPAN,
            arm_frames: ROCKET_ARM_FRAMES,
            spawn_interval: ROCKET_SPAWN_INTERVAL,
            min_spawn_interval: ROCKET_MIN_SPAWN_INTERVAL,
            interval_step: ROCKET_INTERVAL_STEP,
            max_count: ROCKET_MAX_COUNT,
            min_level: ROCKET_MIN_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Minimum distance between a fresh spawn and the live ship
    pub min_distance: f32,
    /// Rejection-sampling budget before the fallback placement is used
    pub max_attempts: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            min_distance: MIN_SPAWN_DISTANCE,
            max_attempts: SPAWN_MAX_ATTEMPTS,
        }
    }
}

/// All tunables for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub session: SessionTuning,
    pub ship: ShipTuning,
    pub bullet: BulletTuning,
    pub asteroid: AsteroidTuning,
    pub rocket: RocketTuning,
    pub spawn: SpawnTuning,
}

impl Tuning {
    /// Parse tunables from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tunables from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&contents)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing an override template)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rocket spawn interval at `level`, never shorter than the floor
    pub fn rocket_interval(&self, level: u32) -> u64 {
        self.rocket
            .spawn_interval
            .saturating_sub(u64::from(level) * self.rocket.interval_step)
            .max(self.rocket.min_spawn_interval)
    }
}
