use bevy::prelude::*;
use constants::render_settings::SHAFT_SMOOTHING;

use super::actors::ActorVisualState;
use crate::engine::simulation::SimulationSession;

/// Per-frame interpolation state of the shaft's vertical scale.
///
/// Owned by the render layer: only [`animate_shaft_reveal`] mutates it, and it
/// may trail the logical step by a few frames.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct ShaftReveal {
    pub scale_y: f32,
}

impl ShaftReveal {
    /// Move one frame toward full height, or collapse when the shaft is hidden
    /// so the next reveal starts from the ground again.
    pub fn step(&mut self, visible: bool) {
        self.scale_y = if visible {
            smooth_toward(self.scale_y, 1.0, SHAFT_SMOOTHING)
        } else {
            0.0
        };
    }
}

/// Exponential smoothing: cover `factor` of the remaining distance.
pub fn smooth_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

pub fn animate_shaft_reveal(
    session: Res<SimulationSession>,
    mut query: Query<(&mut ShaftReveal, &mut Transform)>,
) {
    let visible = ActorVisualState::for_step(session.current_step()).elevator_shaft;
    for (mut reveal, mut transform) in &mut query {
        reveal.step(visible);
        // Zero scale makes a degenerate normal matrix; keep a sliver.
        transform.scale.y = reveal.scale_y.max(1e-4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_monotonically_toward_full_height() {
        let mut reveal = ShaftReveal::default();
        let mut last = reveal.scale_y;
        for _ in 0..120 {
            reveal.step(true);
            assert!(reveal.scale_y > last);
            assert!(reveal.scale_y < 1.0);
            last = reveal.scale_y;
        }
        assert!(reveal.scale_y > 0.99);
    }

    #[test]
    fn first_frame_covers_eight_percent() {
        let mut reveal = ShaftReveal::default();
        reveal.step(true);
        assert!((reveal.scale_y - 0.08).abs() < 1e-6);
    }

    #[test]
    fn hiding_collapses_immediately() {
        let mut reveal = ShaftReveal { scale_y: 0.7 };
        reveal.step(false);
        assert_eq!(reveal.scale_y, 0.0);
    }
}
