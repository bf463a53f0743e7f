use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::render_settings::MOVE_TWEEN_DURATION_MS;
use serde::{Deserialize, Serialize};

use crate::dashboard::model::{DashboardConfig, StatusSnapshot};
use crate::dashboard::store::{DashboardLoaded, StatusSnapshotReceived};
use crate::engine::coordinates::DomainPosition;
use crate::engine::core::app_state::{RenderLoop, ViewerCommand, ViewerState};
use crate::engine::errors::ViewerError;
use crate::engine::scene::objects::SceneObject;
use crate::engine::viewer::{MoveOutcome, Viewer};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

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

/// Outgoing traffic to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
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
            if let Err(e) =
                window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available, host messages disabled"),
    }

    // Ownership moves to JS so the listener outlives this system.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw JSON text received from the host page.
#[derive(Event, Debug, Clone)]
pub struct IncomingRpcMessage {
    pub content: String,
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

/// Everything the method handlers may touch.
#[derive(SystemParam)]
pub struct RpcContext<'w, 's> {
    viewer: Viewer<'w, 's>,
    state: Res<'w, State<ViewerState>>,
    render_loop: Res<'w, RenderLoop>,
    dashboards: EventWriter<'w, DashboardLoaded>,
    snapshots: EventWriter<'w, StatusSnapshotReceived>,
    viewer_commands: EventWriter<'w, ViewerCommand>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut ctx: RpcContext,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut ctx) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Execute one request. Messages without an id run the same way but get no
/// response.
pub fn handle_rpc_request(request: &RpcRequest, ctx: &mut RpcContext) -> Option<RpcResponse> {
    let params = &request.params;
    let result = match request.method.as_str() {
        "load_dashboard" => handle_load_dashboard(params, ctx),
        "push_status_snapshot" => handle_push_status_snapshot(params, ctx),
        "add_objects" => handle_add_objects(params, ctx),
        "get_object" => handle_get_object(params, ctx),
        "move_object" => handle_move_object(params, ctx),
        "get_viewer_state" => handle_get_viewer_state(ctx),
        "dispose_viewer" => handle_dispose_viewer(ctx),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    if let Err(error) = &result {
        warn!("RPC '{}' failed: {}", request.method, error.message);
    }
    let id = request.id.clone()?;

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_load_dashboard(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    let dashboard = serde_json::from_value::<DashboardConfig>(params.clone())
        .map_err(|e| RpcError::invalid_params(&format!("Expected dashboard layout: {e}")))?;

    let response = serde_json::json!({
        "success": true,
        "id": dashboard.id,
        "workStations": dashboard.work_stations.len()
    });
    ctx.dashboards.write(DashboardLoaded(dashboard));
    Ok(response)
}

fn handle_push_status_snapshot(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    let snapshot = serde_json::from_value::<StatusSnapshot>(params.clone())
        .map_err(|e| RpcError::invalid_params(&format!("Expected status snapshot: {e}")))?;

    ctx.snapshots.write(StatusSnapshotReceived(snapshot));
    Ok(serde_json::json!({ "success": true }))
}

fn handle_add_objects(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct AddObjectsParams {
        objects: Vec<SceneObject>,
    }

    let parsed = serde_json::from_value::<AddObjectsParams>(params.clone())
        .map_err(|e| RpcError::invalid_params(&format!("Expected 'objects' array: {e}")))?;
    let count = parsed.objects.len();
    ctx.viewer.add_objects(parsed.objects);

    Ok(serde_json::json!({
        "success": true,
        "count": count,
        "buffered": !ctx.viewer.is_ready()
    }))
}

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

fn handle_get_object(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    let IdParams { id } = serde_json::from_value(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' parameter"))?;

    match ctx.viewer.object_position(&id) {
        Ok(position) => Ok(serde_json::json!({
            "id": id,
            "found": true,
            "pending": false,
            "position": position
        })),
        Err(ViewerError::ObjectNotFound(_)) => Ok(serde_json::json!({
            "id": id,
            "found": false,
            "pending": ctx.viewer.is_known(&id)
        })),
        Err(err) => Err(RpcError::internal_error(&err.to_string())),
    }
}

fn handle_move_object(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct MoveParams {
        id: String,
        x: f32,
        y: f32,
        z: f32,
        duration_ms: Option<u64>,
    }

    let parsed = serde_json::from_value::<MoveParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id', 'x', 'y' and 'z' parameters"))?;
    let duration = Duration::from_millis(parsed.duration_ms.unwrap_or(MOVE_TWEEN_DURATION_MS));
    let target = DomainPosition::new(parsed.x, parsed.y, parsed.z);

    let outcome = ctx
        .viewer
        .move_object_with(&parsed.id, target, duration)
        .map_err(|err| match err {
            ViewerError::ObjectNotFound(id) => RpcError {
                code: -32602,
                message: format!("Object '{id}' not found"),
                data: Some(serde_json::json!({ "id": id })),
            },
            other => RpcError::internal_error(&other.to_string()),
        })?;

    let outcome = match outcome {
        MoveOutcome::Buffered => "buffered",
        MoveOutcome::Unchanged => "unchanged",
        MoveOutcome::Started => "started",
    };
    Ok(serde_json::json!({ "success": true, "id": parsed.id, "outcome": outcome }))
}

fn handle_get_viewer_state(ctx: &mut RpcContext) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "state": ctx.state.get().as_str(),
        "ready": ctx.viewer.is_ready(),
        "objects": ctx.viewer.object_count(),
        "renderTicks": ctx.render_loop.ticks()
    }))
}

fn handle_dispose_viewer(ctx: &mut RpcContext) -> Result<serde_json::Value, RpcError> {
    if *ctx.state.get() == ViewerState::Disposed {
        return Ok(serde_json::json!({ "success": true, "alreadyDisposed": true }));
    }
    ctx.viewer_commands.write(ViewerCommand::Dispose);
    Ok(serde_json::json!({ "success": true, "alreadyDisposed": false }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
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
    if rpc_interface.outgoing_notifications.is_empty() && rpc_interface.outgoing_responses.is_empty() {
        return;
    }

    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

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
        if let Ok(json) = serde_json::to_string(message) {
            debug!("RPC out: {}", json);
        }
    }
}

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
