use bevy::prelude::*;
use constants::phase::PHASE_COUNT;
use constants::render_settings::*;

use crate::engine::simulation::Step;

/// Seconds the phase panel takes to slide and fade in.
pub const PANEL_TRANSITION_SECS: f32 = 0.3;
/// Horizontal slide distance of the phase panel, in pixels.
pub const PANEL_SLIDE_PX: f32 = 20.0;
/// Exponential easing rate of the progress bar, per second.
pub const PROGRESS_EASE_RATE: f32 = 6.0;

// Resources
/// Cached animation state for the shell. Owned by the frame loop.
#[derive(Resource, Debug)]
pub struct ShellAnimation {
    /// Displayed progress bar fraction in `[0, 1]`, eased toward the step.
    pub progress: f32,
    /// Seconds since the phase panel started its entrance.
    pub panel_elapsed: f32,
}

impl Default for ShellAnimation {
    fn default() -> Self {
        Self {
            progress: 0.0,
            panel_elapsed: PANEL_TRANSITION_SECS,
        }
    }
}

impl ShellAnimation {
    pub fn restart_panel(&mut self) {
        self.panel_elapsed = 0.0;
    }

    /// Entrance progress in `[0, 1]`.
    pub fn panel_progress(&self) -> f32 {
        (self.panel_elapsed / PANEL_TRANSITION_SECS).clamp(0.0, 1.0)
    }
}

// Components
#[derive(Component)]
pub struct ShellRoot;
#[derive(Component)]
pub struct ResetButton;
#[derive(Component)]
pub struct ActionButton;
#[derive(Component)]
pub struct ActionLabel;
#[derive(Component)]
pub struct ProgressFill;

/// Stepper badge for phase `number` (1-based).
#[derive(Component)]
pub struct StepperBadge(pub u8);
#[derive(Component)]
pub struct StepperGlyph(pub u8);
#[derive(Component)]
pub struct StepperTitle(pub u8);

#[derive(Component)]
pub struct IdleCard;
#[derive(Component)]
pub struct PhasePanel;
#[derive(Component)]
pub struct PhaseTag;
#[derive(Component)]
pub struct PhaseTitle;
#[derive(Component)]
pub struct PhaseDescription;

/// Row of the "STACK PROCESSING" list for phase `number`.
#[derive(Component)]
pub struct StackRow(pub u8);
#[derive(Component)]
pub struct StackIndex(pub u8);
#[derive(Component)]
pub struct StackTitle(pub u8);

#[derive(Component)]
pub struct ConsoleLines;
#[derive(Component)]
pub struct ConsoleCursor;

/// What the primary button offers for a given session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionButtonState {
    Start,
    Next,
    Computing,
    LoopClosed,
}

impl ActionButtonState {
    pub fn for_session(step: Step, processing: bool) -> Self {
        if processing {
            Self::Computing
        } else if step.is_complete() {
            Self::LoopClosed
        } else if step.is_idle() {
            Self::Start
        } else {
            Self::Next
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start simulation",
            Self::Next => "Next step",
            Self::Computing => "Computing...",
            Self::LoopClosed => "Loop closed",
        }
    }

    pub fn enabled(self) -> bool {
        matches!(self, Self::Start | Self::Next)
    }

    pub fn background(self) -> Color {
        match self {
            Self::Start | Self::Next => CYAN_SKY,
            Self::Computing => SLATE_700,
            Self::LoopClosed => GREEN_DARK,
        }
    }
}

/// Styling bucket shared by stepper badges and the stack list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseProgress {
    Done,
    /// Narration for this phase is running.
    Active,
    Pending,
}

impl PhaseProgress {
    pub fn of(phase_number: u8, step: Step, processing: bool) -> Self {
        if step.value() >= phase_number {
            Self::Done
        } else if processing && step.value() + 1 == phase_number {
            Self::Active
        } else {
            Self::Pending
        }
    }
}

/// Width of the progress fill as a fraction of the track.
pub fn progress_target(step: Step) -> f32 {
    f32::from(step.value()) / f32::from(PHASE_COUNT)
}

/// Frame-rate independent exponential approach.
pub fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = 1.0 - (-rate * dt).exp();
    current + (target - current) * t
}

/// Console line text: zero-padded index, wall-clock time, message.
pub fn console_line(index: usize, time_label: &str, message: &str) -> String {
    format!("[{index:02}] [{time_label}] {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(value: u8) -> Step {
        Step::new(value).unwrap()
    }

    #[test]
    fn action_button_table() {
        let cases = [
            (0, false, "Start simulation", true),
            (0, true, "Computing...", false),
            (1, false, "Next step", true),
            (2, true, "Computing...", false),
            (3, false, "Next step", true),
            (3, true, "Computing...", false),
            (4, false, "Loop closed", false),
        ];
        for (value, processing, label, enabled) in cases {
            let state = ActionButtonState::for_session(step(value), processing);
            assert_eq!(state.label(), label, "step {value}, processing {processing}");
            assert_eq!(state.enabled(), enabled, "step {value}, processing {processing}");
        }
    }

    #[test]
    fn phase_progress_marks_running_phase_active() {
        assert_eq!(PhaseProgress::of(1, step(0), false), PhaseProgress::Pending);
        assert_eq!(PhaseProgress::of(1, step(0), true), PhaseProgress::Active);
        assert_eq!(PhaseProgress::of(2, step(0), true), PhaseProgress::Pending);
        assert_eq!(PhaseProgress::of(2, step(2), false), PhaseProgress::Done);
        assert_eq!(PhaseProgress::of(3, step(2), false), PhaseProgress::Pending);
        assert_eq!(PhaseProgress::of(4, step(4), false), PhaseProgress::Done);
    }

    #[test]
    fn progress_easing_converges() {
        assert_eq!(progress_target(step(0)), 0.0);
        assert_eq!(progress_target(step(2)), 0.5);

        let mut value = 0.0;
        for _ in 0..120 {
            let next = ease_toward(value, 1.0, PROGRESS_EASE_RATE, 1.0 / 60.0);
            assert!(next > value && next <= 1.0);
            value = next;
        }
        assert!(value > 0.99);
    }

    #[test]
    fn console_line_format() {
        assert_eq!(
            console_line(3, "09:15:02", "scene loaded"),
            "[03] [09:15:02] scene loaded"
        );
    }

    #[test]
    fn panel_progress_clamps() {
        let mut anim = ShellAnimation::default();
        assert_eq!(anim.panel_progress(), 1.0);
        anim.restart_panel();
        assert_eq!(anim.panel_progress(), 0.0);
        anim.panel_elapsed = PANEL_TRANSITION_SECS / 2.0;
        assert!((anim.panel_progress() - 0.5).abs() < 1e-6);
    }
}
