//! Scene composition: procedural backdrop, step-driven actors and their labels.
//!
//! Nothing here mutates the simulation; every system reads the latest
//! session step and re-derives its visuals.

/// Procedural background buildings, ground plane and box outlines.
pub mod backdrop;

/// Main building and the narrative props, with the step → visual policy.
pub mod actors;

/// Flat reference grid drawn as line meshes.
pub mod grid;

/// Viewport labels anchored to actor positions.
pub mod labels;

/// Per-frame smoothing of the shaft reveal.
pub mod reveal;

use bevy::prelude::*;

use crate::engine::simulation::SessionUpdate;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                backdrop::spawn_backdrop,
                actors::spawn_scene_actors,
                labels::spawn_world_labels,
            ),
        )
        .add_systems(
            Update,
            (
                actors::apply_actor_visibility,
                actors::apply_building_look,
                actors::animate_floating,
                reveal::animate_shaft_reveal,
                labels::place_world_labels,
            )
                .after(SessionUpdate),
        );
    }
}
