use std::cell::RefCell;
use std::rc::Rc;

use asteroids_core::input::encode_input_byte;
use asteroids_core::{ControlState, InputSource, WorldSnapshot};

/// Wraps an input source and keeps one tape byte per simulated tick.
///
/// The byte is taken in `observe`, which the session calls once per tick
/// before the inner source sees the new world, so it is the control state
/// that tick actually consumed.
pub struct RecordingInput<I> {
    inner: I,
    frames: Rc<RefCell<Vec<u8>>>,
}

impl<I: InputSource> RecordingInput<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            frames: Rc::default(),
        }
    }

    /// Shared handle to the recorded bytes; stays valid after the wrapper is
    /// boxed into a session.
    pub fn frames(&self) -> Rc<RefCell<Vec<u8>>> {
        Rc::clone(&self.frames)
    }
}

impl<I: InputSource> InputSource for RecordingInput<I> {
    fn controls(&self) -> ControlState {
        self.inner.controls()
    }

    fn attach(&mut self) {
        self.frames.borrow_mut().clear();
        self.inner.attach();
    }

    fn detach(&mut self) {
        self.inner.detach();
    }

    fn observe(&mut self, world: &WorldSnapshot) {
        self.frames
            .borrow_mut()
            .push(encode_input_byte(self.inner.controls()));
        self.inner.observe(world);
    }
}
