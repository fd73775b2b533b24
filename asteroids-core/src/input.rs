use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::context::InputSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    ThrustForward,
    ThrustBackward,
    RotateLeft,
    RotateRight,
    Fire,
}

impl Action {
    pub const ALL: [Self; 5] = [
        Self::ThrustForward,
        Self::ThrustBackward,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Fire,
    ];

    /// Maps a DOM-style `KeyboardEvent.key` name to the action it drives.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::ThrustForward),
            "ArrowDown" => Some(Self::ThrustBackward),
            "ArrowLeft" => Some(Self::RotateLeft),
            "ArrowRight" => Some(Self::RotateRight),
            " " | "Space" => Some(Self::Fire),
            _ => None,
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Self::RotateLeft => 0x01,
            Self::RotateRight => 0x02,
            Self::ThrustForward => 0x04,
            Self::Fire => 0x08,
            Self::ThrustBackward => 0x10,
        }
    }
}

pub const INPUT_BITS_MASK: u8 = 0x1F;

/// Held state of every control for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl ControlState {
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        fire: false,
    };

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::ThrustForward => self.forward,
            Action::ThrustBackward => self.backward,
            Action::RotateLeft => self.left,
            Action::RotateRight => self.right,
            Action::Fire => self.fire,
        }
    }

    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::ThrustForward => self.forward = held,
            Action::ThrustBackward => self.backward = held,
            Action::RotateLeft => self.left = held,
            Action::RotateRight => self.right = held,
            Action::Fire => self.fire = held,
        }
    }

    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }
}

#[inline]
pub fn encode_input_byte(input: ControlState) -> u8 {
    Action::ALL
        .iter()
        .filter(|action| input.is_held(**action))
        .fold(0, |byte, action| byte | action.bit())
}

#[inline]
pub fn decode_input_byte(byte: u8) -> ControlState {
    let mut input = ControlState::IDLE;
    for action in Action::ALL {
        input.set(action, (byte & action.bit()) != 0);
    }
    input
}

#[derive(Debug, Default)]
struct KeyMap {
    held: ControlState,
    attached: bool,
}

/// Key-state map shared between whatever delivers key events and the session.
///
/// Clones share one map. Edge events overwrite the held flag for their action,
/// so only the latest state at tick time is observed. While detached the map is
/// empty and events are dropped.
#[derive(Clone, Debug, Default)]
pub struct KeyboardInput {
    keys: Rc<RefCell<KeyMap>>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&self, key: &str) {
        if let Some(action) = Action::from_key(key) {
            self.press(action);
        }
    }

    pub fn key_up(&self, key: &str) {
        if let Some(action) = Action::from_key(key) {
            self.release(action);
        }
    }

    pub fn press(&self, action: Action) {
        let mut keys = self.keys.borrow_mut();
        if keys.attached {
            keys.held.set(action, true);
        }
    }

    pub fn release(&self, action: Action) {
        let mut keys = self.keys.borrow_mut();
        if keys.attached {
            keys.held.set(action, false);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.keys.borrow().attached
    }
}

impl InputSource for KeyboardInput {
    fn controls(&self) -> ControlState {
        self.keys.borrow().held
    }

    fn attach(&mut self) {
        let mut keys = self.keys.borrow_mut();
        keys.held = ControlState::IDLE;
        keys.attached = true;
    }

    fn detach(&mut self) {
        let mut keys = self.keys.borrow_mut();
        keys.held = ControlState::IDLE;
        keys.attached = false;
    }
}

/// Replays a recorded input tape, one byte per tick; idle once exhausted.
#[derive(Clone, Debug)]
pub struct TapeInput {
    inputs: Vec<u8>,
    cursor: usize,
    attached: bool,
}

impl TapeInput {
    pub fn new(inputs: Vec<u8>) -> Self {
        Self {
            inputs,
            cursor: 0,
            attached: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len().saturating_sub(self.cursor)
    }
}

impl InputSource for TapeInput {
    fn controls(&self) -> ControlState {
        match self.inputs.get(self.cursor) {
            Some(byte) if self.attached => decode_input_byte(*byte),
            _ => ControlState::IDLE,
        }
    }

    fn attach(&mut self) {
        self.cursor = 0;
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn observe(&mut self, _world: &crate::sim::WorldSnapshot) {
        if self.attached {
            self.cursor += 1;
        }
    }
}
