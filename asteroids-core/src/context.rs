//! Seams between the simulation loop and the outside world.
//!
//! A [`GameSession`](crate::session::GameSession) only talks to the platform
//! through these traits, bundled in a [`GameContext`] at construction time.

use core::time::Duration;
use std::cell::Cell;
use std::rc::Rc;

use crate::error::StoreError;
use crate::input::ControlState;
use crate::sim::{Asteroid, Bullet, Ship, WorldSnapshot};

#[derive(Clone, Copy, Debug)]
pub enum Entity<'a> {
    Ship { ship: &'a Ship, thrusting: bool },
    Bullet(&'a Bullet),
    Asteroid(&'a Asteroid),
}

pub trait Renderer {
    fn clear_and_redraw_background(&mut self);
    fn draw_entity(&mut self, entity: Entity<'_>);
    /// Called whenever the ship wraps across an edge.
    fn regenerate_background(&mut self);
    fn draw_time_text(&mut self, label: &str, value: &str);
    /// End of frame.
    fn present(&mut self) {}
}

pub trait InputSource {
    fn controls(&self) -> ControlState;
    fn attach(&mut self);
    /// After this returns no held state may reach the simulation.
    fn detach(&mut self);
    /// Sees the world after every tick.
    fn observe(&mut self, _world: &WorldSnapshot) {}
}

pub trait BestTimeStore {
    /// `None` when nothing has been recorded or the record is unreadable.
    fn best_time(&self) -> Option<Duration>;
    fn set_best_time(&mut self, best: Duration) -> Result<(), StoreError>;
}

pub trait Overlay {
    fn show_menu(&mut self, best: Option<Duration>);
    fn show_game_over(&mut self, elapsed: Duration, best: Option<Duration>);
}

pub trait Clock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;
}

pub struct GameContext {
    pub renderer: Box<dyn Renderer>,
    pub input: Box<dyn InputSource>,
    pub store: Box<dyn BestTimeStore>,
    pub overlay: Box<dyn Overlay>,
    pub clock: Box<dyn Clock>,
}

/// In-memory best time. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    best: Rc<Cell<Option<Duration>>>,
}

impl MemoryStore {
    pub fn new(best: Option<Duration>) -> Self {
        Self {
            best: Rc::new(Cell::new(best)),
        }
    }
}

impl BestTimeStore for MemoryStore {
    fn best_time(&self) -> Option<Duration> {
        self.best.get()
    }

    fn set_best_time(&mut self, best: Duration) -> Result<(), StoreError> {
        self.best.set(Some(best));
        Ok(())
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear_and_redraw_background(&mut self) {}
    fn draw_entity(&mut self, _entity: Entity<'_>) {}
    fn regenerate_background(&mut self) {}
    fn draw_time_text(&mut self, _label: &str, _value: &str) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullOverlay;

impl Overlay for NullOverlay {
    fn show_menu(&mut self, _best: Option<Duration>) {}
    fn show_game_over(&mut self, _elapsed: Duration, _best: Option<Duration>) {}
}
