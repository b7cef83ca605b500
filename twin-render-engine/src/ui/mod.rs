//! Screen-space shell around the 3D viewport.
//!
//! Header with progress stepper, viewport overlays, the phase panel, the
//! console and the primary action button. Everything here is a projection of
//! [`SimulationSession`](crate::engine::simulation::SimulationSession); the
//! only state the shell owns is animation progress in [`state::ShellAnimation`].
//!
//! Input flows back as `SessionRequest` events, the same path the host
//! bridge uses.

/// Button handlers and native keyboard shortcuts.
pub mod interactions;

/// Node tree construction.
pub mod layout;

/// Per-frame reflection of session state into text, colours and animation.
pub mod reflect;

/// Marker components, the shell animation resource and pure styling rules.
pub mod state;

use bevy::prelude::*;

use crate::engine::simulation::SessionUpdate;
use interactions::{action_button_interaction, reset_button_interaction};
use reflect::*;
use state::ShellAnimation;

pub struct UiShellPlugin;

impl Plugin for UiShellPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShellAnimation>()
            .add_systems(Startup, layout::spawn_shell)
            .add_systems(
                Update,
                (action_button_interaction, reset_button_interaction).before(SessionUpdate),
            )
            .add_systems(
                Update,
                (
                    reflect_action_button,
                    reflect_stepper,
                    ease_progress_bar,
                    (reflect_phase_panel, animate_panel_entrance).chain(),
                    render_console,
                    blink_console_cursor,
                )
                    .after(SessionUpdate),
            );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(
            Update,
            interactions::keyboard_shortcuts.before(SessionUpdate),
        );
    }
}
