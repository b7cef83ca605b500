//! JSON-RPC 2.0 bridge between the engine and its host page.
//!
//! On `wasm32` the engine runs inside an iframe and exchanges messages with
//! the parent window over `postMessage`. Native builds keep the same
//! systems but drop outgoing messages.
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Queue session event
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ──────┤
//! ```
//!
//! ## Methods
//!
//! - `advance`: queue a step advance, replies `{ accepted, step }`
//! - `reset`: return the session to idle, replies `{ step: 0 }`
//! - `get_state`: step, processing flag, status, current phase and log.
//!   Optional param `include_log` (default `true`)
//! - `get_phases`: the four phase descriptors
//! - `get_fps`: current smoothed frame rate
//!
//! ## Notifications
//!
//! `step_changed`, `log_appended`, `processing_changed`, `session_reset`
//! and `fps_update`.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request (including unparseable JSON)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// Session change forwarding.
pub mod notifications;

/// JSON-RPC 2.0 bidirectional communication system for host integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
