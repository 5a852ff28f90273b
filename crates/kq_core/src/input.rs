//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Used for continuous actions like walking or defending.
//!
//! - **Edge-triggered (just_pressed / just_released):** derived by comparing the
//!   held set against the snapshot taken at the end of the previous simulated
//!   frame. `end_frame()` takes that snapshot, so gameplay code never has to
//!   latch or clear anything itself. A press and release that both land between
//!   two simulated frames is not observed.

use std::collections::HashSet;

use serde::Deserialize;

/// Logical game keys. The platform layer maps physical keys onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Attack,
    Dash,
    Defend,
    Run,
    Restart,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Attack,
        Key::Dash,
        Key::Defend,
        Key::Run,
        Key::Restart,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    held_prev: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Replace the whole held set, as a scripted input source does each frame.
    pub fn set_held<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = Key>,
    {
        self.held = keys.into_iter().collect();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.held.contains(&key) && !self.held_prev.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        !self.held.contains(&key) && self.held_prev.contains(&key)
    }

    /// Snapshot the held set. Call once per simulated frame, after the
    /// simulation has read the input.
    pub fn end_frame(&mut self) {
        self.held_prev.clone_from(&self.held);
    }
}
