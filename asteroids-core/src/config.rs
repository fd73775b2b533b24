use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ASTEROID_CHILD_SPEED_MAX, ASTEROID_CHILD_SPEED_MIN, ASTEROID_CULL_MARGIN_FAR,
    ASTEROID_CULL_MARGIN_NEAR, ASTEROID_SPIN_MAX, ASTEROID_SPLIT_RATIO_MAX,
    ASTEROID_SPLIT_RATIO_MIN, ASTEROID_SPLIT_THRESHOLD, BULLET_COOLDOWN_TICKS, BULLET_RADIUS,
    BULLET_VELOCITY, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, SHIP_ACCELERATION, SHIP_DECELERATION,
    SHIP_FRICTION, SHIP_MAX_SPEED, SHIP_RADIUS, SHIP_ROTATION_DEGREES_PER_TICK,
    SHIP_SPEED_EPSILON, SPAWN_BASE_MIN, SPAWN_BASE_SPREAD, SPAWN_CENTER_PULL, SPAWN_EDGE_OFFSET,
    SPAWN_ESCALATION_STEP, SPAWN_ESCALATION_THRESHOLDS_MS, SPAWN_RADIUS_MAX, SPAWN_RADIUS_MIN,
    SPAWN_VELOCITY_JITTER,
};
use crate::error::ConfigError;
use crate::vector::Vec2;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: Playfield,
    pub ship: ShipTuning,
    pub asteroids: AsteroidTuning,
    pub spawn: SpawnTuning,
}

impl GameConfig {
    pub fn with_playfield(mut self, width: f64, height: f64) -> Self {
        self.playfield = Playfield { width, height };
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Playfield { width, height } = self.playfield;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::PlayfieldSize { width, height });
        }
        if !(self.ship.max_speed > 0.0) {
            return Err(ConfigError::ShipMaxSpeed {
                max_speed: self.ship.max_speed,
            });
        }
        if !(self.ship.friction > 0.0 && self.ship.friction <= 1.0) {
            return Err(ConfigError::ShipFriction {
                friction: self.ship.friction,
            });
        }
        if self.ship.bullet_cooldown_ticks == 0 {
            return Err(ConfigError::BulletCooldown);
        }
        let (min, max) = (self.spawn.radius_min, self.spawn.radius_max);
        if !(min > 0.0 && max >= min) {
            return Err(ConfigError::AsteroidRadiusRange { min, max });
        }
        let (min, max) = (
            self.asteroids.split_ratio_min,
            self.asteroids.split_ratio_max,
        );
        if !(min > 0.0 && max < 1.0 && max >= min) {
            return Err(ConfigError::SplitRatioRange { min, max });
        }
        let threshold = self.asteroids.split_threshold;
        if !(threshold > 0.0) {
            return Err(ConfigError::SplitThreshold { threshold });
        }
        let (min, max) = (
            self.asteroids.child_speed_min,
            self.asteroids.child_speed_max,
        );
        if !(min > 0.0 && max >= min) {
            return Err(ConfigError::ChildSpeedRange { min, max });
        }
        // Spin and jitter are drawn from symmetric ranges around zero.
        let spin_max = self.asteroids.spin_max;
        if !(spin_max >= 0.0) {
            return Err(ConfigError::AsteroidSpin { spin_max });
        }
        let jitter = self.spawn.velocity_jitter;
        if !(jitter >= 0.0) {
            return Err(ConfigError::VelocityJitter { jitter });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    pub radius: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub friction: f64,
    pub rotation_degrees_per_tick: f64,
    pub speed_epsilon: f64,
    pub bullet_radius: f64,
    pub bullet_velocity: f64,
    pub bullet_cooldown_ticks: u32,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            radius: SHIP_RADIUS,
            max_speed: SHIP_MAX_SPEED,
            acceleration: SHIP_ACCELERATION,
            deceleration: SHIP_DECELERATION,
            friction: SHIP_FRICTION,
            rotation_degrees_per_tick: SHIP_ROTATION_DEGREES_PER_TICK,
            speed_epsilon: SHIP_SPEED_EPSILON,
            bullet_radius: BULLET_RADIUS,
            bullet_velocity: BULLET_VELOCITY,
            bullet_cooldown_ticks: BULLET_COOLDOWN_TICKS,
        }
    }
}

impl ShipTuning {
    #[inline]
    pub fn rotation_step(&self) -> f64 {
        self.rotation_degrees_per_tick.to_radians()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidTuning {
    pub split_threshold: f64,
    pub split_ratio_min: f64,
    pub split_ratio_max: f64,
    pub child_speed_min: f64,
    pub child_speed_max: f64,
    pub spin_max: f64,
    pub cull_margin_near: f64,
    pub cull_margin_far: f64,
}

impl Default for AsteroidTuning {
    fn default() -> Self {
        Self {
            split_threshold: ASTEROID_SPLIT_THRESHOLD,
            split_ratio_min: ASTEROID_SPLIT_RATIO_MIN,
            split_ratio_max: ASTEROID_SPLIT_RATIO_MAX,
            child_speed_min: ASTEROID_CHILD_SPEED_MIN,
            child_speed_max: ASTEROID_CHILD_SPEED_MAX,
            spin_max: ASTEROID_SPIN_MAX,
            cull_margin_near: ASTEROID_CULL_MARGIN_NEAR,
            cull_margin_far: ASTEROID_CULL_MARGIN_FAR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub edge_offset: f64,
    pub base_min: u32,
    pub base_spread: u32,
    pub escalation_step: u32,
    pub escalation_thresholds_ms: Vec<u64>,
    pub radius_min: f64,
    pub radius_max: f64,
    pub center_pull: f64,
    pub velocity_jitter: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            edge_offset: SPAWN_EDGE_OFFSET,
            base_min: SPAWN_BASE_MIN,
            base_spread: SPAWN_BASE_SPREAD,
            escalation_step: SPAWN_ESCALATION_STEP,
            escalation_thresholds_ms: SPAWN_ESCALATION_THRESHOLDS_MS.to_vec(),
            radius_min: SPAWN_RADIUS_MIN,
            radius_max: SPAWN_RADIUS_MAX,
            center_pull: SPAWN_CENTER_PULL,
            velocity_jitter: SPAWN_VELOCITY_JITTER,
        }
    }
}

impl SpawnTuning {
    /// Extra asteroids owed for surviving past each escalation threshold.
    pub fn escalation_bonus(&self, elapsed: Duration) -> u32 {
        let elapsed_ms = elapsed.as_millis();
        let passed = self
            .escalation_thresholds_ms
            .iter()
            .filter(|threshold| elapsed_ms > u128::from(**threshold))
            .count() as u32;
        passed * self.escalation_step
    }
}
