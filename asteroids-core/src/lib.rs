//! Deterministic simulation core for an endless-survival asteroids game.
//!
//! The core never touches a window, a keyboard, or a disk. Everything
//! platform-shaped goes through the traits in [`context`], so the same
//! session runs in a terminal, in a headless replay, or in tests.

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod hud;
pub mod input;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod tape;
pub mod vector;

pub use config::{AsteroidTuning, GameConfig, Playfield, ShipTuning, SpawnTuning};
pub use context::{
    BestTimeStore, Clock, Entity, GameContext, InputSource, ManualClock, MemoryStore,
    NullOverlay, NullRenderer, Overlay, Renderer,
};
pub use error::{ConfigError, StoreError, TapeError};
pub use input::{Action, ControlState, KeyboardInput, TapeInput};
pub use rng::SeededRng;
pub use scheduler::{FrameScheduler, VirtualScheduler};
pub use session::{GameOverSummary, GameSession, Phase, RunOutcome, TickStatus};
pub use sim::{replay, ReplayResult, Simulation, SimulationStats, TickReport, WorldSnapshot};
pub use tape::{parse_tape, serialize_tape, TapeHeader, TapeView};
pub use vector::Vec2;
