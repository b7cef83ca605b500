//! Systems that mirror `SimulationSession` into the shell every frame.

use bevy::prelude::*;
use constants::phase::{PHASE_COUNT, PHASES, PhaseIcon};
use constants::render_settings::*;

use super::layout::PanelFade;
use super::state::*;
use crate::engine::simulation::{SessionReset, SimulationSession, StepChanged};

pub fn reflect_action_button(
    session: Res<SimulationSession>,
    mut buttons: Query<(&Interaction, &mut BackgroundColor), With<ActionButton>>,
    mut labels: Query<&mut Text, With<ActionLabel>>,
) {
    let state = ActionButtonState::for_session(session.current_step(), session.is_processing());

    for (interaction, mut bg) in &mut buttons {
        let base = state.background();
        let color = match (*interaction, state.enabled()) {
            (Interaction::Hovered, true) => CYAN_LIGHT,
            (Interaction::Pressed, true) => CYAN_ACCENT,
            _ => base,
        };
        bg.set_if_neq(BackgroundColor(color));
    }

    if let Ok(mut text) = labels.single_mut() {
        if text.0 != state.label() {
            *text = Text::new(state.label());
        }
    }
}

pub fn reflect_stepper(
    session: Res<SimulationSession>,
    mut badges: Query<(&StepperBadge, &mut BackgroundColor, &mut BorderColor)>,
    mut glyphs: Query<(&StepperGlyph, &mut Text, &mut TextColor), Without<StepperTitle>>,
    mut titles: Query<(&StepperTitle, &mut TextColor), Without<StepperGlyph>>,
) {
    if !session.is_changed() {
        return;
    }
    let step = session.current_step();
    let processing = session.is_processing();

    for (badge, mut bg, mut border) in &mut badges {
        let (fill, edge) = match PhaseProgress::of(badge.0, step, processing) {
            PhaseProgress::Done => (CYAN_SKY, CYAN_PALE),
            PhaseProgress::Active => (CYAN_SKY.with_alpha(0.2), CYAN_LIGHT),
            PhaseProgress::Pending => (SLATE_900, SLATE_700),
        };
        *bg = BackgroundColor(fill);
        *border = BorderColor(edge);
    }

    for (glyph, mut text, mut color) in &mut glyphs {
        let progress = PhaseProgress::of(glyph.0, step, processing);
        let symbol = match progress {
            PhaseProgress::Done => PhaseIcon::Check.glyph(),
            _ => phase_glyph(glyph.0),
        };
        if text.0 != symbol {
            *text = Text::new(symbol);
        }
        color.0 = match progress {
            PhaseProgress::Pending => SLATE_500,
            _ => Color::WHITE,
        };
    }

    for (title, mut color) in &mut titles {
        color.0 = if step.value() >= title.0 {
            CYAN_LIGHT
        } else {
            SLATE_600
        };
    }
}

fn phase_glyph(number: u8) -> &'static str {
    PHASES
        .iter()
        .find(|p| p.number == number)
        .map_or("", |p| p.icon.glyph())
}

pub fn ease_progress_bar(
    time: Res<Time>,
    session: Res<SimulationSession>,
    mut animation: ResMut<ShellAnimation>,
    mut fills: Query<&mut Node, With<ProgressFill>>,
) {
    let target = progress_target(session.current_step());
    animation.progress = ease_toward(
        animation.progress,
        target,
        PROGRESS_EASE_RATE,
        time.delta_secs(),
    );

    for mut node in &mut fills {
        node.width = Val::Percent(animation.progress * 100.0);
    }
}

/// Switches between the idle card and the phase panel and fills in the phase.
pub fn reflect_phase_panel(
    session: Res<SimulationSession>,
    mut cards: ParamSet<(
        Query<&mut Node, With<IdleCard>>,
        Query<&mut Node, With<PhasePanel>>,
    )>,
    mut texts: ParamSet<(
        Query<&mut Text, With<PhaseTag>>,
        Query<&mut Text, With<PhaseTitle>>,
        Query<&mut Text, With<PhaseDescription>>,
        Query<(&StackIndex, &mut Text, &mut PanelFade)>,
        Query<(&StackTitle, &mut PanelFade)>,
    )>,
    mut rows: Query<(&StackRow, &mut BackgroundColor, &mut BorderColor)>,
) {
    if !session.is_changed() {
        return;
    }
    let step = session.current_step();
    let phase = session.current_phase();

    if let Ok(mut node) = cards.p0().single_mut() {
        node.display = if phase.is_none() {
            Display::Flex
        } else {
            Display::None
        };
    }
    if let Ok(mut node) = cards.p1().single_mut() {
        node.display = if phase.is_some() {
            Display::Flex
        } else {
            Display::None
        };
    }

    let Some(phase) = phase else {
        return;
    };

    let tag = format!("PHASE {:02}", phase.number);
    if let Ok(mut text) = texts.p0().single_mut() {
        if text.0 != tag {
            *text = Text::new(tag);
        }
    }
    if let Ok(mut text) = texts.p1().single_mut() {
        if text.0 != phase.title {
            *text = Text::new(phase.title);
        }
    }
    if let Ok(mut text) = texts.p2().single_mut() {
        if text.0 != phase.description {
            *text = Text::new(phase.description);
        }
    }

    for (row, mut bg, mut border) in &mut rows {
        let (fill, edge) = match stack_progress(row.0, step.value()) {
            PhaseProgress::Done => (GREEN.with_alpha(0.1), GREEN.with_alpha(0.3)),
            PhaseProgress::Active => (CYAN_SKY.with_alpha(0.1), CYAN_SKY.with_alpha(0.4)),
            PhaseProgress::Pending => (SLATE_900.with_alpha(0.2), Color::WHITE.with_alpha(0.05)),
        };
        *bg = BackgroundColor(fill);
        *border = BorderColor(edge);
    }

    for (index, mut text, mut fade) in &mut texts.p3() {
        let done = stack_progress(index.0, step.value()) == PhaseProgress::Done;
        let symbol = if done {
            PhaseIcon::Check.glyph().to_string()
        } else {
            index.0.to_string()
        };
        if text.0 != symbol {
            *text = Text::new(symbol);
        }
        fade.base = if done { Color::WHITE } else { SLATE_500 };
    }

    for (title, mut fade) in &mut texts.p4() {
        fade.base = match stack_progress(title.0, step.value()) {
            PhaseProgress::Done => SLATE_200,
            PhaseProgress::Active => CYAN_LIGHT,
            PhaseProgress::Pending => SLATE_600,
        };
    }
}

/// Stack list styling: phases behind the current one are done, the one on
/// screen is active. Everything is done once the loop is closed.
pub fn stack_progress(number: u8, step: u8) -> PhaseProgress {
    if number < step || step == PHASE_COUNT {
        PhaseProgress::Done
    } else if number == step {
        PhaseProgress::Active
    } else {
        PhaseProgress::Pending
    }
}

/// Slide and fade the phase panel in after each committed step change or reset.
pub fn animate_panel_entrance(
    time: Res<Time>,
    mut animation: ResMut<ShellAnimation>,
    mut step_changes: EventReader<StepChanged>,
    mut resets: EventReader<SessionReset>,
    mut panels: Query<&mut Node, Or<(With<PhasePanel>, With<IdleCard>)>>,
    mut texts: Query<(&PanelFade, &mut TextColor)>,
) {
    let restarted = step_changes.read().count() + resets.read().count() > 0;
    if restarted {
        animation.restart_panel();
    } else if animation.panel_progress() >= 1.0 {
        return;
    } else {
        animation.panel_elapsed += time.delta_secs();
    }

    let progress = animation.panel_progress();
    let offset = PANEL_SLIDE_PX * (1.0 - progress);
    for mut node in &mut panels {
        node.left = Val::Px(offset);
    }
    for (fade, mut color) in &mut texts {
        color.0 = fade.base.with_alpha(fade.base.alpha() * progress);
    }
}

pub fn render_console(
    mut commands: Commands,
    session: Res<SimulationSession>,
    lines: Query<Entity, With<ConsoleLines>>,
    mut rendered_total: Local<u64>,
) {
    let log = session.log();
    if *rendered_total == log.appended_total() {
        return;
    }
    let Ok(container) = lines.single() else {
        return;
    };
    *rendered_total = log.appended_total();

    commands
        .entity(container)
        .despawn_related::<Children>()
        .with_children(|parent| {
            for (index, entry) in log.entries().enumerate() {
                let color = if entry.is_alert() {
                    RED_LIGHT
                } else {
                    CYAN_LIGHT.with_alpha(0.7)
                };
                parent.spawn((
                    Text::new(console_line(index, &entry.time_label(), &entry.message)),
                    TextFont {
                        font_size: 10.0,
                        ..default()
                    },
                    TextColor(color),
                ));
            }
        });
}

pub fn blink_console_cursor(
    time: Res<Time>,
    mut cursors: Query<&mut BackgroundColor, With<ConsoleCursor>>,
) {
    let alpha = 0.6 + 0.4 * (time.elapsed_secs() * std::f32::consts::TAU).cos();
    for mut bg in &mut cursors {
        bg.0 = CYAN_SKY.with_alpha(alpha);
    }
}
