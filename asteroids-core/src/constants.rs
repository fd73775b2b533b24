use core::time::Duration;

pub const FPS: u32 = 120;
pub const TICK_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / FPS as u64);

pub const PLAYFIELD_WIDTH: f64 = 1_280.0;
pub const PLAYFIELD_HEIGHT: f64 = 720.0;

pub const SHIP_RADIUS: f64 = 20.0;
pub const SHIP_MAX_SPEED: f64 = 0.02;
pub const SHIP_ACCELERATION: f64 = 0.0008;
pub const SHIP_DECELERATION: f64 = 0.0001;
pub const SHIP_FRICTION: f64 = 0.9925;
pub const SHIP_ROTATION_DEGREES_PER_TICK: f64 = 1.15;
pub const SHIP_SPEED_EPSILON: f64 = 0.0001;

pub const BULLET_RADIUS: f64 = 3.0;
pub const BULLET_VELOCITY: f64 = 5.0;
// Ticks between shots: FPS / 6, i.e. six shots per second at full rate.
pub const BULLET_COOLDOWN_TICKS: u32 = FPS / 6;

pub const ASTEROID_SPLIT_THRESHOLD: f64 = 20.0;
pub const ASTEROID_SPLIT_RATIO_MIN: f64 = 0.4;
pub const ASTEROID_SPLIT_RATIO_MAX: f64 = 0.6;
pub const ASTEROID_CHILD_SPEED_MIN: f64 = 0.6;
pub const ASTEROID_CHILD_SPEED_MAX: f64 = 1.0;
pub const ASTEROID_SPIN_MAX: f64 = 0.005;
pub const ASTEROID_COLOR: Rgb = Rgb(0xee, 0xee, 0xee);

/// Asteroids are culled once they are this far past the left or top edge.
pub const ASTEROID_CULL_MARGIN_NEAR: f64 = 100.0;
/// Asteroids are culled once they are this far past the right or bottom edge.
pub const ASTEROID_CULL_MARGIN_FAR: f64 = 50.0;

pub const SPAWN_EDGE_OFFSET: f64 = 50.0;
pub const SPAWN_BASE_MIN: u32 = 5;
pub const SPAWN_BASE_SPREAD: u32 = 10;
pub const SPAWN_ESCALATION_STEP: u32 = 5;
pub const SPAWN_ESCALATION_THRESHOLDS_MS: [u64; 3] = [30_000, 60_000, 500_000];
pub const SPAWN_RADIUS_MIN: f64 = 25.0;
pub const SPAWN_RADIUS_MAX: f64 = 75.0;
pub const SPAWN_CENTER_PULL: f64 = 1.0 / 1_000.0;
pub const SPAWN_VELOCITY_JITTER: f64 = 0.5;

pub const BEST_TIME_KEY: &str = "asteroids-high-score";

pub const TAPE_MAGIC: u32 = 0x3154_5341; // "AST1"
pub const TAPE_VERSION: u8 = 1;
pub const TAPE_HEADER_SIZE: usize = 16;
pub const TAPE_FOOTER_SIZE: usize = 4;

/// Cosmetic color carried by entities for renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);
