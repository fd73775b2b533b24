//! Terminal shell around the simulation core: concrete collaborators for a
//! [`GameSession`](asteroids_core::GameSession) plus config loading.

pub mod autopilot;
pub mod clock;
pub mod config;
pub mod overlay;
pub mod record;
pub mod render;
pub mod store;

pub use autopilot::{Autopilot, AutopilotTuning};
pub use clock::{MonotonicClock, RealtimeScheduler};
pub use config::{load_config, parse_seed, seed_to_hex, EnvOverrides};
pub use overlay::LogOverlay;
pub use record::RecordingInput;
pub use render::TerminalRenderer;
pub use store::JsonFileStore;
