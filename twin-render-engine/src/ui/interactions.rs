use bevy::prelude::*;
use constants::render_settings::*;

use super::state::*;
use crate::engine::simulation::{RequestSource, SessionRequest, SimulationSession};

// Primary button asks the session to advance; colour is handled by the reflect pass
pub fn action_button_interaction(
    q: Query<&Interaction, (Changed<Interaction>, With<Button>, With<ActionButton>)>,
    session: Res<SimulationSession>,
    mut requests: EventWriter<SessionRequest>,
) {
    for interaction in &q {
        if *interaction != Interaction::Pressed {
            continue;
        }
        // Disabled buttons swallow the click.
        if session.can_advance() {
            requests.write(SessionRequest::advance(RequestSource::Ui));
        } else {
            debug!("Action button pressed while disabled");
        }
    }
}

pub fn reset_button_interaction(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<ResetButton>),
    >,
    mut requests: EventWriter<SessionRequest>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                requests.write(SessionRequest::reset(RequestSource::Ui));
                *bg = BackgroundColor(SLATE_900);
            }
            Interaction::Hovered => *bg = BackgroundColor(SLATE_700),
            Interaction::None => *bg = BackgroundColor(SLATE_800),
        }
    }
}

/// Space or Enter advances, R resets.
#[cfg(not(target_arch = "wasm32"))]
pub fn keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<SessionRequest>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        requests.write(SessionRequest::reset(RequestSource::Keyboard));
    }
    if keyboard.any_just_pressed([KeyCode::Space, KeyCode::Enter]) {
        requests.write(SessionRequest::advance(RequestSource::Keyboard));
    }
}
