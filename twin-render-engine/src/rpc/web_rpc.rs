use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::simulation::{
    RequestSource, SessionRequest, SessionRequestKind, SessionUpdate, SimulationSession,
};
use crate::engine::systems::fps_tracking::smoothed_fps;

use super::notifications::forward_session_events;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    #[cfg(test)]
    pub fn pending_responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }
}

/// Plugin establishing the WebRPC communication layer for iframe-based deployment.
///
/// Requests are turned into session events before the session updates, and
/// session changes are forwarded after it, so a request and its effects
/// reach the host in the same frame where possible.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .before(SessionUpdate),
            )
            .add_systems(
                Update,
                (forward_session_events, send_outgoing_messages)
                    .chain()
                    .after(SessionUpdate),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Only string payloads can carry JSON-RPC.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => warn!("Window object not available, host bridge disabled"),
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only view of the engine handed to request handlers, plus the
/// session requests they queue, in call order.
struct RpcContext<'a> {
    session: &'a SimulationSession,
    fps: Option<f32>,
    commands: Vec<SessionRequestKind>,
}

impl<'a> RpcContext<'a> {
    fn new(session: &'a SimulationSession, fps: Option<f32>) -> Self {
        Self {
            session,
            fps,
            commands: Vec::new(),
        }
    }

    /// Whether an advance queued now would be accepted once the batch is
    /// applied. Requests run in call order, so only the latest one matters.
    fn advance_would_succeed(&self) -> bool {
        match self.commands.last() {
            None => self.session.can_advance(),
            Some(SessionRequestKind::Reset) => true,
            // Only accepted advances are queued, and each one starts a script.
            Some(SessionRequestKind::Advance) => false,
        }
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    session: Res<SimulationSession>,
    diagnostics: Res<DiagnosticsStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut requests: EventWriter<SessionRequest>,
) {
    let mut context = RpcContext::new(&session, smoothed_fps(&diagnostics));

    for event in events.read() {
        let response = match parse_request(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                handle_rpc_request(&request, &mut context)
            }
            Err(error_response) => Some(error_response),
        };
        if let Some(response) = response {
            rpc_interface.queue_response(response);
        }
    }

    requests.write_batch(context.commands.into_iter().map(|kind| SessionRequest {
        kind,
        source: RequestSource::Rpc,
    }));
}

/// Parse a raw message. Malformed input becomes an error response with a null id.
fn parse_request(content: &str) -> Result<RpcRequest, RpcResponse> {
    let request = serde_json::from_str::<RpcRequest>(content).map_err(|parse_error| {
        warn!("Rejected malformed RPC message: {}", parse_error);
        create_error_response(
            serde_json::Value::Null,
            -32600,
            "Invalid request",
            Some(serde_json::json!({ "reason": parse_error.to_string() })),
        )
    })?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(create_error_response(
            request.id.unwrap_or(serde_json::Value::Null),
            -32600,
            "Invalid request",
            Some(serde_json::json!({ "reason": "jsonrpc must be \"2.0\"" })),
        ));
    }
    Ok(request)
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "advance" => handle_advance(context),
        "reset" => handle_reset(context),
        "get_state" => handle_get_state(&request.params, context),
        "get_phases" => handle_get_phases(context),
        "get_fps" => handle_get_fps(context),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            // Unknown notifications are dropped silently.
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    // Notifications have side effects but no response.
    let id = request.id.clone()?;

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Queue an advance. The reply reports whether it will be accepted and the
/// step it starts from; the transition itself arrives as `step_changed`.
fn handle_advance(context: &mut RpcContext) -> Result<serde_json::Value, RpcError> {
    let accepted = context.advance_would_succeed();
    if accepted {
        context.commands.push(SessionRequestKind::Advance);
    } else {
        debug!("RPC advance ignored, session cannot advance");
    }

    Ok(serde_json::json!({
        "accepted": accepted,
        "step": context.session.current_step().value(),
    }))
}

fn handle_reset(context: &mut RpcContext) -> Result<serde_json::Value, RpcError> {
    context.commands.push(SessionRequestKind::Reset);
    Ok(serde_json::json!({ "step": 0 }))
}

/// Snapshot of the session as the UI shell sees it.
fn handle_get_state(
    params: &serde_json::Value,
    context: &RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct GetStateParams {
        include_log: Option<bool>,
    }

    let state_params = if params.is_null() {
        GetStateParams::default()
    } else {
        serde_json::from_value::<GetStateParams>(params.clone())
            .map_err(|_| RpcError::invalid_params("Expected optional boolean 'include_log'"))?
    };

    let session = context.session;
    let log = if state_params.include_log.unwrap_or(true) {
        session
            .log_entries()
            .map(|entry| {
                serde_json::json!({
                    "message": entry.message,
                    "time": entry.time_label(),
                    "alert": entry.is_alert(),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let status = serde_json::to_value(session.status())
        .map_err(|e| RpcError::internal_error(&format!("Failed to encode status: {e}")))?;
    let phase = serde_json::to_value(session.current_phase())
        .map_err(|e| RpcError::internal_error(&format!("Failed to encode phase: {e}")))?;

    Ok(serde_json::json!({
        "step": session.current_step().value(),
        "processing": session.is_processing(),
        "status": status,
        "phase": phase,
        "log": log,
    }))
}

fn handle_get_phases(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(context.session.phases())
        .map_err(|e| RpcError::internal_error(&format!("Failed to encode phases: {e}")))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "fps": context.fps.unwrap_or(0.0)
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: JSONRPC_VERSION.to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // Native builds have no host page.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: Some(json!(7)),
        }
    }

    fn error_code(response: &RpcResponse) -> Option<i32> {
        response.error.as_ref().map(|e| e.code)
    }

    #[test]
    fn unknown_method_is_not_found() {
        let session = SimulationSession::default();
        let mut context = RpcContext::new(&session, None);
        let response = handle_rpc_request(&request("launch_rockets", json!({})), &mut context)
            .expect("requests with an id get a response");
        assert_eq!(error_code(&response), Some(-32601));
        assert_eq!(response.id, Some(json!(7)));
        assert!(context.commands.is_empty());
    }

    #[test]
    fn malformed_json_becomes_invalid_request() {
        let response = parse_request("{\"jsonrpc\": \"2.0\", \"method\":").unwrap_err();
        assert_eq!(error_code(&response), Some(-32600));
        assert_eq!(response.id, Some(serde_json::Value::Null));

        let wrong_version = parse_request(r#"{"jsonrpc":"1.0","method":"reset","id":3}"#);
        let response = wrong_version.unwrap_err();
        assert_eq!(error_code(&response), Some(-32600));
        assert_eq!(response.id, Some(json!(3)));
    }

    #[test]
    fn missing_params_default_to_null() {
        let parsed = parse_request(r#"{"jsonrpc":"2.0","method":"get_fps","id":1}"#).unwrap();
        assert!(parsed.params.is_null());
    }

    #[test]
    fn get_state_rejects_bad_params() {
        let session = SimulationSession::default();
        let mut context = RpcContext::new(&session, None);
        let response = handle_rpc_request(
            &request("get_state", json!({ "include_log": "yes" })),
            &mut context,
        )
        .unwrap();
        assert_eq!(error_code(&response), Some(-32602));
    }

    #[test]
    fn get_state_reflects_session() {
        let mut session = SimulationSession::default();
        session.advance().unwrap();
        let mut context = RpcContext::new(&session, None);
        let response =
            handle_rpc_request(&request("get_state", serde_json::Value::Null), &mut context)
                .unwrap();
        let state = response.result.unwrap();

        assert_eq!(state["step"], json!(0));
        assert_eq!(state["processing"], json!(true));
        assert_eq!(state["status"]["kind"], json!("processing"));
        assert!(state["phase"].is_null());
        assert_eq!(state["log"].as_array().unwrap().len(), session.log().len());
        assert_eq!(state["log"][0]["message"], json!("engine initialized"));

        let response = handle_rpc_request(
            &request("get_state", json!({ "include_log": false })),
            &mut context,
        )
        .unwrap();
        assert!(response.result.unwrap()["log"].as_array().unwrap().is_empty());
    }

    #[test]
    fn advance_is_queued_once_per_batch() {
        let session = SimulationSession::default();
        let mut context = RpcContext::new(&session, None);

        let first = handle_rpc_request(&request("advance", json!({})), &mut context).unwrap();
        let second = handle_rpc_request(&request("advance", json!({})), &mut context).unwrap();

        assert_eq!(first.result.unwrap()["accepted"], json!(true));
        assert_eq!(second.result.unwrap()["accepted"], json!(false));
        assert_eq!(context.commands, vec![SessionRequestKind::Advance]);
    }

    #[test]
    fn advance_while_processing_is_refused() {
        let mut session = SimulationSession::default();
        session.advance().unwrap();
        let mut context = RpcContext::new(&session, None);
        let response = handle_rpc_request(&request("advance", json!({})), &mut context).unwrap();
        assert_eq!(response.result.unwrap()["accepted"], json!(false));
        assert!(context.commands.is_empty());

        // A reset earlier in the same batch frees the session again.
        handle_rpc_request(&request("reset", json!({})), &mut context);
        let response = handle_rpc_request(&request("advance", json!({})), &mut context).unwrap();
        assert_eq!(response.result.unwrap()["accepted"], json!(true));
        assert_eq!(
            context.commands,
            vec![SessionRequestKind::Reset, SessionRequestKind::Advance]
        );
    }

    #[test]
    fn batch_is_replayed_in_call_order() {
        let session = SimulationSession::default();
        let mut context = RpcContext::new(&session, None);
        fn accepted(context: &mut RpcContext) -> serde_json::Value {
            handle_rpc_request(&request("advance", json!({})), context)
                .unwrap()
                .result
                .unwrap()["accepted"]
                .clone()
        }

        assert_eq!(accepted(&mut context), json!(true));
        handle_rpc_request(&request("reset", json!({})), &mut context);
        assert_eq!(accepted(&mut context), json!(true));
        assert_eq!(accepted(&mut context), json!(false));
        assert_eq!(
            context.commands,
            vec![
                SessionRequestKind::Advance,
                SessionRequestKind::Reset,
                SessionRequestKind::Advance
            ]
        );
    }

    #[test]
    fn notification_requests_get_no_response() {
        let session = SimulationSession::default();
        let mut context = RpcContext::new(&session, None);
        let mut reset = request("reset", json!({}));
        reset.id = None;
        assert!(handle_rpc_request(&reset, &mut context).is_none());
        assert_eq!(context.commands, vec![SessionRequestKind::Reset]);
    }

    #[test]
    fn get_phases_lists_four_descriptors() {
        let session = SimulationSession::default();
        let mut context = RpcContext::new(&session, Some(60.0));
        let phases = handle_rpc_request(&request("get_phases", json!({})), &mut context)
            .unwrap()
            .result
            .unwrap();
        let phases = phases.as_array().unwrap();
        assert_eq!(phases.len(), 4);
        assert_eq!(phases[0]["title"], json!("Global Perception"));

        let fps = handle_rpc_request(&request("get_fps", json!({})), &mut context)
            .unwrap()
            .result
            .unwrap();
        assert_eq!(fps["fps"], json!(60.0));
    }

    #[test]
    fn rpc_messages_drive_the_session() {
        use crate::engine::simulation::SimulationPlugin;

        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<DiagnosticsStore>()
            .add_plugins(SimulationPlugin)
            .init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(Update, handle_rpc_messages.before(SessionUpdate));

        app.world_mut().send_event(IncomingRpcMessage {
            content: r#"{"jsonrpc":"2.0","method":"advance","id":1}"#.into(),
        });
        app.update();

        assert!(app.world().resource::<SimulationSession>().is_processing());
        let rpc = app.world().resource::<WebRpcInterface>();
        assert_eq!(rpc.pending_responses().len(), 1);
        assert_eq!(
            rpc.pending_responses()[0].result.as_ref().unwrap()["accepted"],
            json!(true)
        );
    }

    #[test]
    fn advance_then_reset_batch_ends_idle() {
        use crate::engine::simulation::SimulationPlugin;
        use constants::narration::BOOTSTRAP_LINES;

        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<DiagnosticsStore>()
            .add_plugins(SimulationPlugin)
            .init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(Update, handle_rpc_messages.before(SessionUpdate));

        for content in [
            r#"{"jsonrpc":"2.0","method":"advance","id":1}"#,
            r#"{"jsonrpc":"2.0","method":"reset","id":2}"#,
        ] {
            app.world_mut().send_event(IncomingRpcMessage {
                content: content.into(),
            });
        }
        app.update();

        let session = app.world().resource::<SimulationSession>();
        assert_eq!(session.current_step().value(), 0);
        assert!(!session.is_processing());
        assert_eq!(session.log().messages(), BOOTSTRAP_LINES.to_vec());
    }
}
