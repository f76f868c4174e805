/// Frontend-neutral keyboard snapshot for one frame.

use std::collections::HashSet;

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Escape,
    P,
    Q,
}

/// `pressed` holds keys that went down this frame; `held` holds every key
/// that is currently down (a pressed key is also held).
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pressed: HashSet<Key>,
    held: HashSet<Key>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: `key` went down this frame.
    pub fn press(mut self, key: Key) -> Self {
        self.pressed.insert(key);
        self.held.insert(key);
        self
    }

    /// Builder: `key` is being held from an earlier frame.
    pub fn hold(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn any_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.pressed(*k))
    }

    /// Movement direction from the held arrow keys, one unit per axis.
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.held(Key::Left) {
            axis.x -= 1.0;
        }
        if self.held(Key::Right) {
            axis.x += 1.0;
        }
        if self.held(Key::Up) {
            axis.y -= 1.0;
        }
        if self.held(Key::Down) {
            axis.y += 1.0;
        }
        axis
    }
}
