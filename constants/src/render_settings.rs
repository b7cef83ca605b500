use bevy::prelude::*;

// Palette

pub const BACKGROUND: Color = Color::srgb_u8(3, 8, 22);
pub const CYAN_SKY: Color = Color::srgb_u8(14, 165, 233);
pub const CYAN_LIGHT: Color = Color::srgb_u8(56, 189, 248);
pub const CYAN_PALE: Color = Color::srgb_u8(125, 211, 252);
pub const CYAN_ACCENT: Color = Color::srgb_u8(34, 211, 238);
pub const SLATE_900: Color = Color::srgb_u8(15, 23, 42);
pub const SLATE_800: Color = Color::srgb_u8(30, 41, 59);
pub const SLATE_700: Color = Color::srgb_u8(51, 65, 85);
pub const SLATE_600: Color = Color::srgb_u8(71, 85, 105);
pub const SLATE_500: Color = Color::srgb_u8(100, 116, 139);
pub const SLATE_400: Color = Color::srgb_u8(148, 163, 184);
pub const SLATE_200: Color = Color::srgb_u8(226, 232, 240);
pub const BACKDROP_BODY: Color = Color::srgb_u8(39, 52, 68);
pub const ROSE: Color = Color::srgb_u8(244, 63, 94);
pub const RED: Color = Color::srgb_u8(239, 68, 68);
pub const RED_LIGHT: Color = Color::srgb_u8(248, 113, 113);
pub const GREEN: Color = Color::srgb_u8(34, 197, 94);
pub const GREEN_DARK: Color = Color::srgb_u8(22, 163, 74);
pub const YELLOW: Color = Color::srgb_u8(250, 204, 21);

// Camera and lighting

pub const CAMERA_START: Vec3 = Vec3::new(35.0, 25.0, 35.0);
pub const CAMERA_FOV_DEGREES: f32 = 28.0;
pub const CAMERA_MIN_DISTANCE: f32 = 20.0;
pub const CAMERA_MAX_DISTANCE: f32 = 100.0;
/// Largest angle between the camera offset and the zenith.
pub const CAMERA_MAX_POLAR_ANGLE: f32 = std::f32::consts::PI / 2.1;
pub const CAMERA_AUTO_ROTATE_SPEED: f32 = 0.5;

pub const FOG_START: f32 = 30.0;
pub const FOG_END: f32 = 150.0;

pub const AMBIENT_BRIGHTNESS: f32 = 400.0;
pub const DIRECTIONAL_LIGHT_POSITION: Vec3 = Vec3::new(40.0, 60.0, 40.0);
pub const DIRECTIONAL_LIGHT_ILLUMINANCE: f32 = 12_000.0;
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(-30.0, 30.0, -30.0);
pub const POINT_LIGHT_INTENSITY: f32 = 4_000_000.0;

// Scene actors

pub const MAIN_BUILDING_CENTER: Vec3 = Vec3::new(0.0, 2.5, 0.0);
pub const MAIN_BUILDING_SIZE: Vec3 = Vec3::new(4.0, 6.0, 2.0);
pub const WINDOW_PANEL_FLOORS: u32 = 5;
pub const WINDOW_PANEL_COLUMNS: u32 = 3;
pub const WINDOW_PANEL_SIZE: f32 = 0.8;
pub const WINDOW_PANEL_SPACING: f32 = 1.2;
pub const WINDOW_PANEL_EMISSIVE: f32 = 5.0;

pub const MARKER_CENTER: Vec3 = Vec3::new(0.0, 4.0, 3.0);
pub const MARKER_RADIUS: f32 = 0.7;
pub const MARKER_EMISSIVE: f32 = 3.0;
pub const MARKER_FLOAT_SPEED: f32 = 4.0;

pub const SHAFT_ANCHOR: Vec3 = Vec3::new(0.0, 2.5, 1.35);
pub const SHAFT_SIZE: Vec3 = Vec3::new(1.6, 6.0, 0.9);
pub const SHAFT_EMISSIVE: f32 = 3.0;
/// Fraction of the remaining distance the shaft covers each frame.
pub const SHAFT_SMOOTHING: f32 = 0.08;
pub const SHAFT_LABEL_OFFSET: Vec3 = Vec3::new(1.4, 2.5, 0.0);
pub const SHAFT_LABEL: &str = "AGENT_BIM: MODULE_GEN";

pub const BEACON_CENTER: Vec3 = Vec3::new(0.0, -1.8, 3.0);
pub const BEACON_RADIUS: f32 = 0.4;
pub const BEACON_LENGTH: f32 = 40.0;
pub const BEACON_EMISSIVE: f32 = 4.0;
pub const BEACON_LABEL_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 0.0);
pub const BEACON_LABEL: &str = "! CRITICAL CONFLICT: underground pipe network intrusion (-1.2m)";

pub const MODULE_SIZE: Vec3 = Vec3::new(1.7, 6.2, 1.0);
pub const MODULE_EMISSIVE: f32 = 0.5;

/// Label font size is `LABEL_FONT_SIZE * LABEL_DISTANCE_FACTOR / distance`.
pub const LABEL_DISTANCE_FACTOR: f32 = 12.0;
pub const LABEL_FONT_SIZE: f32 = 48.0;
