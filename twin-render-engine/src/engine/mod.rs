//! Bevy engine for the urban renewal twin.
//!
//! The simulation session owns all state. The scene, camera and UI shell
//! are projections of it, rebuilt every frame.

/// Orbit camera with auto-rotation while the simulation is idle.
pub mod camera;

/// App construction, window configuration and scene settings.
pub mod core;

/// Procedural backdrop, ground grid and the step-driven actors.
pub mod scene;

/// Step state machine and timed narration.
pub mod simulation;

/// Diagnostics systems.
pub mod systems;
