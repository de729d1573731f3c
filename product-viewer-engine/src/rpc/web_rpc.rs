use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::catalog::{ProductKind, lookup, product_info};
use crate::engine::core::app_state::ViewerState;
use crate::engine::scene::scene_manager::{ProductScene, ViewerCommand, ViewerEvent};
use crate::tools::measure::MeasureState;

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

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

/// What RPC handlers may read about the viewer.
#[derive(Debug, Clone, Default)]
pub struct ViewerSnapshot {
    pub running: bool,
    pub product: Option<ProductKind>,
    pub auto_rotate: bool,
    pub measures_visible: bool,
    pub readout: Option<String>,
}

impl ViewerSnapshot {
    /// Project a queued command so later requests in the same batch see its effect.
    fn apply(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::SelectProduct(kind) => {
                self.product = Some(kind);
                self.readout = None;
            }
            ViewerCommand::ResetView => self.readout = None,
            ViewerCommand::SetAutoRotate(enabled) => self.auto_rotate = enabled,
            ViewerCommand::ToggleAutoRotate => self.auto_rotate = !self.auto_rotate,
            ViewerCommand::ToggleMeasures => self.measures_visible = !self.measures_visible,
            ViewerCommand::Dispose => self.running = false,
        }
    }
}

fn queue_command(
    command: ViewerCommand,
    snapshot: &mut ViewerSnapshot,
    commands: &mut Vec<ViewerCommand>,
) {
    snapshot.apply(command);
    commands.push(command);
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
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
                    forward_viewer_events,
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

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(err) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            warn!("Failed to register message listener: {:?}", err);
            return;
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
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

pub fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    viewer_state: Option<Res<State<ViewerState>>>,
    scene: Res<ProductScene>,
    measure: Res<MeasureState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    let mut snapshot = ViewerSnapshot {
        running: viewer_state
            .as_deref()
            .is_some_and(|state| *state.get() == ViewerState::Running),
        product: scene.displayed_kind(),
        auto_rotate: scene.auto_rotate,
        measures_visible: scene.measures_visible,
        readout: measure.readout().map(str::to_string),
    };

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                let mut queued = Vec::new();
                if let Some(response) = handle_rpc_request(&request, &mut snapshot, &mut queued) {
                    rpc_interface.queue_response(response);
                }
                for command in queued {
                    viewer_commands.write(command);
                }
            }
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
/// Accepted commands are pushed to `commands` and folded into `snapshot`;
/// requests without an id are executed but not answered.
pub fn handle_rpc_request(
    request: &RpcRequest,
    snapshot: &mut ViewerSnapshot,
    commands: &mut Vec<ViewerCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_viewer_state" => Ok(viewer_state_json(snapshot)),
        "select_product" | "reset_view" | "set_auto_rotate" | "toggle_auto_rotate"
        | "toggle_measures" | "dispose_viewer"
            if !snapshot.running =>
        {
            Err(RpcError::internal_error("Viewer is not running"))
        }
        "select_product" => handle_select_product(&request.params, snapshot, commands),
        "reset_view" => {
            queue_command(ViewerCommand::ResetView, snapshot, commands);
            Ok(serde_json::json!({ "success": true }))
        }
        "set_auto_rotate" => handle_set_auto_rotate(&request.params, snapshot, commands),
        "toggle_auto_rotate" => {
            queue_command(ViewerCommand::ToggleAutoRotate, snapshot, commands);
            Ok(serde_json::json!({ "success": true, "auto_rotate": snapshot.auto_rotate }))
        }
        "toggle_measures" => {
            queue_command(ViewerCommand::ToggleMeasures, snapshot, commands);
            Ok(serde_json::json!({
                "success": true,
                "measures_visible": snapshot.measures_visible
            }))
        }
        "dispose_viewer" => {
            queue_command(ViewerCommand::Dispose, snapshot, commands);
            Ok(serde_json::json!({ "success": true }))
        }
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({ "method": request.method })),
            })
        }
    };

    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_select_product(
    params: &serde_json::Value,
    snapshot: &mut ViewerSnapshot,
    commands: &mut Vec<ViewerCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectProductParams {
        product: String,
    }

    let parsed = serde_json::from_value::<SelectProductParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'product' parameter"))?;

    let kind = ProductKind::from_str(&parsed.product)
        .map_err(|err| RpcError::invalid_params(&err.to_string()))?;

    queue_command(ViewerCommand::SelectProduct(kind), snapshot, commands);
    info!("Product selection dispatched: {}", kind.id());

    Ok(serde_json::json!({
        "success": true,
        "product": kind.id()
    }))
}

fn handle_set_auto_rotate(
    params: &serde_json::Value,
    snapshot: &mut ViewerSnapshot,
    commands: &mut Vec<ViewerCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct AutoRotateParams {
        enabled: bool,
    }

    let parsed = serde_json::from_value::<AutoRotateParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected boolean 'enabled' parameter"))?;

    queue_command(ViewerCommand::SetAutoRotate(parsed.enabled), snapshot, commands);
    Ok(serde_json::json!({
        "success": true,
        "auto_rotate": parsed.enabled
    }))
}

fn viewer_state_json(snapshot: &ViewerSnapshot) -> serde_json::Value {
    serde_json::json!({
        "running": snapshot.running,
        "product": snapshot.product.map(|kind| kind.id()),
        "auto_rotate": snapshot.auto_rotate,
        "measures_visible": snapshot.measures_visible,
        "measurement": snapshot.readout,
    })
}

/// Method name and payload announced to the host page for a viewer event.
pub fn notification_for(event: &ViewerEvent) -> (&'static str, serde_json::Value) {
    match event {
        ViewerEvent::ProductChanged(kind) => {
            let measurement = lookup(*kind);
            let info = product_info(*kind);
            (
                "product_changed",
                serde_json::json!({
                    "product": kind.id(),
                    "name": info.name,
                    "summary": info.summary,
                    "description": info.description,
                    "width": measurement.width_label(),
                    "height": measurement.height_label(),
                    "shape": measurement.shape_label,
                    "places": measurement.places_label,
                }),
            )
        }
        ViewerEvent::AutoRotateChanged(enabled) => (
            "auto_rotate_changed",
            serde_json::json!({ "enabled": enabled }),
        ),
        ViewerEvent::MeasuresVisibilityChanged(visible) => (
            "measures_visibility_changed",
            serde_json::json!({ "visible": visible }),
        ),
        ViewerEvent::MeasurePlaced {
            kind,
            x_cm,
            y_cm,
            text,
        } => (
            "measure_point",
            serde_json::json!({
                "product": kind.id(),
                "x_cm": x_cm,
                "y_cm": y_cm,
                "text": text,
            }),
        ),
        ViewerEvent::MeasureCleared => ("measure_cleared", serde_json::json!({})),
        ViewerEvent::Disposed => ("viewer_disposed", serde_json::json!({})),
    }
}

pub fn forward_viewer_events(
    mut viewer_events: EventReader<ViewerEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in viewer_events.read() {
        let (method, params) = notification_for(event);
        rpc_interface.send_notification(method, params);
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

/// Send serialized message to parent window (host page).
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
        // No-op for non-WASM targets.
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
