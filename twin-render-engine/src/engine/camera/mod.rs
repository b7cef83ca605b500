//! Orbit camera around the main building.
//!
//! Mouse drag rotates, the wheel zooms, and the camera turns on its own while
//! the session is idle.

/// Orbit camera resource and controller system.
pub mod orbit_camera;
