//! Process-wide policy data shared by the engine.
//!
//! Everything here is compile-time constant: the phase table, the narration
//! scripts, backdrop generation ranges and the render palette.

pub mod backdrop;
pub mod narration;
pub mod phase;
pub mod render_settings;
