//! Logical keys and the per-frame input state the simulation reads.

use std::collections::HashSet;

use crate::entities::Facing;

/// Logical keys. Physical bindings belong to the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Movement for player slot 0 or 1.
    Move(usize, Facing),
    Fire(usize),
    /// Title screen: switch between one and two players.
    ToggleMode,
    Start,
}

pub trait InputSource {
    /// Level-triggered: the key is down this frame.
    fn is_held(&self, key: Key) -> bool;
    /// Edge-triggered: the key went down this frame.
    fn just_pressed(&self, key: Key) -> bool;
}

/// One frame of keyboard state.
#[derive(Clone, Debug, Default)]
pub struct KeyState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> KeyState {
        KeyState::default()
    }

    pub fn holding(mut self, key: Key) -> KeyState {
        self.hold(key);
        self
    }

    pub fn pressing(mut self, key: Key) -> KeyState {
        self.press(key);
        self
    }

    pub fn hold(&mut self, key: Key) {
        self.held.insert(key);
    }

    /// A fresh press also counts as held for this frame.
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Forget edge-triggered presses; held keys stay down.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for KeyState {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}
