//! Runtime diagnostics systems.
//!
//! Frame rate is pushed to the host page via RPC and, on native builds,
//! shown in a small overlay.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host via RPC and updates the native overlay.
pub mod fps_tracking;
