use bevy::prelude::*;
use constants::backdrop::STRUCTURE_COUNT;

/// Inputs to scene generation. Read once at startup.
#[derive(Resource, Debug, Clone)]
pub struct SceneSettings {
    pub backdrop_count: usize,
    /// Fixed seed for a reproducible backdrop; `None` picks a fresh layout each session.
    pub backdrop_seed: Option<u64>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            backdrop_count: STRUCTURE_COUNT,
            backdrop_seed: None,
        }
    }
}
