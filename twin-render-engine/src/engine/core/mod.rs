//! Core application setup.
//!
//! Handles application lifecycle, window configuration, lighting and camera
//! spawning, and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the simulation, scene, UI shell and host bridge.
pub mod app_setup;

/// Scene-level settings that embedders and tests may override.
pub mod scene_settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;

pub use scene_settings::SceneSettings;
