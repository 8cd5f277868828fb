//! Keyboard state sampled once per simulation step.
//!
//! The host (or a replay) writes the keys that are down, the game reads them
//! during `update`, and `end_frame` remembers what was down so the next step
//! can tell a fresh press from a held key. Movement polls `is_held`; the title
//! screen polls `is_just_pressed` so holding Enter starts one game, not several.
//!
//! A tap that goes down and back up between two `end_frame` calls is never
//! seen.

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    Space,
    Shift,
    Enter,
    Escape,
}

impl Key {
    /// Parse the lowercase key names used by replay files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "a" => Some(Self::A),
            "d" => Some(Self::D),
            "space" | " " => Some(Self::Space),
            "shift" => Some(Self::Shift),
            "enter" => Some(Self::Enter),
            "escape" | "esc" => Some(Self::Escape),
            _ => None,
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A set of keys packed into one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySet(u16);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    pub fn from_keys(keys: &[Key]) -> Self {
        keys.iter().fold(Self::EMPTY, |set, &key| set.with(key))
    }

    pub const fn with(self, key: Key) -> Self {
        Self(self.0 | key.bit())
    }

    pub const fn without(self, key: Key) -> Self {
        Self(self.0 & !key.bit())
    }

    pub const fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: KeySet,
    /// What was held when the previous step ended.
    previous: KeySet,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held = self.held.with(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held = self.held.without(key);
    }

    /// Replace the held keys with exactly `keys`.
    pub fn apply_snapshot(&mut self, keys: &[Key]) {
        self.held = KeySet::from_keys(keys);
    }

    pub fn held(&self) -> KeySet {
        self.held
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(key)
    }

    pub fn is_any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|&key| self.held.contains(key))
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.held.contains(key) && !self.previous.contains(key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        !self.held.contains(key) && self.previous.contains(key)
    }

    pub fn end_frame(&mut self) {
        self.previous = self.held;
    }
}
