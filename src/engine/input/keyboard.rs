// Keyboard key-press tracking for polling

use super::event::KeyEvent;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Keys currently held down, shared between event delivery and polling
///
/// Every read and write holds the same lock for the duration of the list
/// scan or mutation only.
#[derive(Debug, Default)]
pub struct PressedKeys {
    keys: Mutex<Vec<KeyEvent>>,
}

impl PressedKeys {
    /// Create an empty key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition
    ///
    /// A press is appended; a release removes every recorded press of the
    /// same character.
    pub fn handle_press(&self, key: &KeyEvent) {
        let mut keys = self.lock();

        if key.pressed {
            keys.push(*key);
        } else {
            keys.retain(|pressed| pressed.character != key.character);
        }
    }

    /// Check if a key is currently held
    pub fn is_pressed(&self, character: u32) -> bool {
        self.lock().iter().any(|key| key.character == character)
    }

    /// Number of recorded presses, duplicates included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no key is held
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget every held key
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<KeyEvent>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
