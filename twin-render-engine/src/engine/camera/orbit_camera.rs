use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::render_settings::{
    CAMERA_AUTO_ROTATE_SPEED, CAMERA_MAX_DISTANCE, CAMERA_MAX_POLAR_ANGLE, CAMERA_MIN_DISTANCE,
    CAMERA_START,
};

use crate::engine::scene::actors::ActorVisualState;
use crate::engine::simulation::SimulationSession;

const MIN_POLAR_ANGLE: f32 = 0.05;
const ROTATE_SENSITIVITY: f32 = 0.005;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    /// Rotation around the vertical axis, radians.
    pub yaw: f32,
    /// Angle between the camera offset and the zenith, radians.
    pub polar: f32,
    pub auto_rotate: bool,
}

impl OrbitCamera {
    /// Orbit that places the camera at `position` looking at `focus_point`.
    pub fn from_position(position: Vec3, focus_point: Vec3) -> Self {
        let offset = position - focus_point;
        let distance = offset.length().clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        Self {
            focus_point,
            distance,
            yaw: offset.x.atan2(offset.z),
            polar: (offset.y / offset.length())
                .acos()
                .clamp(MIN_POLAR_ANGLE, CAMERA_MAX_POLAR_ANGLE),
            auto_rotate: true,
        }
    }

    pub fn offset(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(sin_polar * sin_yaw, cos_polar, sin_polar * cos_yaw) * self.distance
    }

    pub fn target_transform(&self) -> Transform {
        Transform::from_translation(self.focus_point + self.offset())
            .looking_at(self.focus_point, Vec3::Y)
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ROTATE_SENSITIVITY;
        self.polar =
            (self.polar - delta.y * ROTATE_SENSITIVITY).clamp(MIN_POLAR_ANGLE, CAMERA_MAX_POLAR_ANGLE);
    }

    /// Positive `amount` zooms in.
    pub fn zoom(&mut self, amount: f32) {
        let factor = 0.9_f32.powf(amount);
        self.distance = (self.distance * factor).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(CAMERA_START, Vec3::ZERO)
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    session: Res<SimulationSession>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Auto-rotation is driven by the step, not by the user.
    orbit.auto_rotate = ActorVisualState::for_step(session.current_step()).auto_rotate;

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let dragging = mouse_button.any_pressed([MouseButton::Left, MouseButton::Right]);
    if dragging && mouse_delta != Vec2::ZERO {
        orbit.rotate(mouse_delta);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        orbit.zoom(scroll_accum);
    }

    if orbit.auto_rotate && !dragging {
        orbit.yaw += CAMERA_AUTO_ROTATE_SPEED * time.delta_secs();
    }

    let target = orbit.target_transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_reproduces_start_position() {
        let orbit = OrbitCamera::default();
        let position = orbit.focus_point + orbit.offset();
        assert!(position.distance(CAMERA_START) < 1e-3, "{position}");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.zoom(100.0);
        assert_eq!(orbit.distance, CAMERA_MIN_DISTANCE);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance, CAMERA_MAX_DISTANCE);
    }

    #[test]
    fn polar_angle_never_dips_below_the_horizon_limit() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(0.0, -10_000.0));
        assert_eq!(orbit.polar, CAMERA_MAX_POLAR_ANGLE);
        assert!(orbit.offset().y > 0.0);
        orbit.rotate(Vec2::new(0.0, 10_000.0));
        assert_eq!(orbit.polar, MIN_POLAR_ANGLE);
    }
}
