use bevy::prelude::*;
use std::collections::HashMap;

use common::level::Level;

// ============================================================================
// Bevy Resources
// ============================================================================

// Level loaded at startup. Never mutated afterwards.
#[derive(Resource)]
pub struct ActiveLevel(pub Level);

// Index of the next script entry to fire
#[derive(Resource, Default)]
pub struct ScriptCursor(pub usize);

// Failed quiz attempts per key
#[derive(Resource, Default, Debug)]
pub struct KeyFailures(pub HashMap<String, u32>);

impl KeyFailures {
    pub fn register(&mut self, key: &str) -> u32 {
        let count = self.0.entry(key.to_owned()).or_default();
        *count += 1;
        *count
    }

    #[must_use]
    pub fn count(&self, key: &str) -> u32 {
        self.0.get(key).copied().unwrap_or_default()
    }
}
