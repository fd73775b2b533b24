use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    PlayfieldSize { width: f64, height: f64 },
    ShipMaxSpeed { max_speed: f64 },
    ShipFriction { friction: f64 },
    BulletCooldown,
    AsteroidRadiusRange { min: f64, max: f64 },
    SplitRatioRange { min: f64, max: f64 },
    SplitThreshold { threshold: f64 },
    ChildSpeedRange { min: f64, max: f64 },
    AsteroidSpin { spin_max: f64 },
    VelocityJitter { jitter: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayfieldSize { width, height } => {
                write!(f, "playfield must be non-empty: got {width}x{height}")
            }
            Self::ShipMaxSpeed { max_speed } => {
                write!(f, "ship max speed must be positive: got {max_speed}")
            }
            Self::ShipFriction { friction } => {
                write!(f, "ship friction must be in (0, 1]: got {friction}")
            }
            Self::BulletCooldown => write!(f, "bullet cooldown must be at least one tick"),
            Self::AsteroidRadiusRange { min, max } => {
                write!(f, "asteroid radius range is empty or non-positive: [{min}, {max}]")
            }
            Self::SplitRatioRange { min, max } => {
                write!(f, "split ratio range must lie inside (0, 1): [{min}, {max}]")
            }
            Self::SplitThreshold { threshold } => {
                write!(f, "split threshold must be positive: got {threshold}")
            }
            Self::ChildSpeedRange { min, max } => {
                write!(f, "child speed range is empty or non-positive: [{min}, {max}]")
            }
            Self::AsteroidSpin { spin_max } => {
                write!(f, "asteroid spin must not be negative: got {spin_max}")
            }
            Self::VelocityJitter { jitter } => {
                write!(f, "spawn velocity jitter must not be negative: got {jitter}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TapeError {
    TapeTooShort { actual: usize, min: usize },
    InvalidMagic { found: u32 },
    UnsupportedVersion { found: u8 },
    HeaderReservedNonZero,
    TapeLengthMismatch { expected: usize, actual: usize },
    ReservedInputBitsNonZero { frame: u32, byte: u8 },
    CrcMismatch { stored: u32, computed: u32 },
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TapeTooShort { actual, min } => {
                write!(f, "tape too short: got {actual} bytes, need at least {min}")
            }
            Self::InvalidMagic { found } => write!(f, "invalid tape magic: 0x{found:08x}"),
            Self::UnsupportedVersion { found } => write!(f, "unsupported tape version: {found}"),
            Self::HeaderReservedNonZero => write!(f, "header reserved bytes are non-zero"),
            Self::TapeLengthMismatch { expected, actual } => write!(
                f,
                "tape length mismatch: expected {expected} bytes, got {actual}"
            ),
            Self::ReservedInputBitsNonZero { frame, byte } => write!(
                f,
                "input byte reserved bits set at frame {frame}: 0x{byte:02x}"
            ),
            Self::CrcMismatch { stored, computed } => write!(
                f,
                "crc mismatch: stored=0x{stored:08x}, computed=0x{computed:08x}"
            ),
        }
    }
}

impl std::error::Error for TapeError {}

/// Failure reported by a best-time backend. Never fatal to a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    Io(String),
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(message) => write!(f, "best-time store i/o failed: {message}"),
            Self::Decode(message) => write!(f, "best-time store is unreadable: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}
