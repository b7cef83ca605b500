//! Generation ranges for the decorative city backdrop.

/// Structures generated per scene session.
pub const STRUCTURE_COUNT: usize = 65;

/// Inner exclusion radius; keeps the main building visually isolated.
pub const RADIUS_MIN: f32 = 15.0;
pub const RADIUS_MAX: f32 = 60.0;

pub const HEIGHT_MIN: f32 = 4.0;
pub const HEIGHT_MAX: f32 = 19.0;
pub const WIDTH_MIN: f32 = 3.0;
pub const WIDTH_MAX: f32 = 7.0;
pub const DEPTH_MIN: f32 = 3.0;
pub const DEPTH_MAX: f32 = 7.0;

/// Y coordinate the base of every structure rests on.
pub const GROUND_OFFSET: f32 = -0.5;

pub const EMISSIVE_PROBABILITY: f64 = 0.5;

/// Side length of the lit window plane on emissive structures.
pub const WINDOW_SIZE: f32 = 0.4;
/// Window height above the structure centre, as a fraction of its height.
pub const WINDOW_HEIGHT_FRACTION: f32 = 0.2;
/// Window offset from the centre along +Z, as a fraction of the depth.
pub const WINDOW_DEPTH_FRACTION: f32 = 0.51;

pub const GROUND_PLANE_SIZE: f32 = 300.0;
pub const GROUND_PLANE_Y: f32 = -0.48;

pub const GRID_SIZE: f32 = 120.0;
pub const GRID_DIVISIONS: u32 = 40;
pub const GRID_Y: f32 = -0.47;
