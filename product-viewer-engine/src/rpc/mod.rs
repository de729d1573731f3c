//! JSON-RPC 2.0 bridge between the viewer and the host page.
//!
//! The viewer runs inside a page (or iframe) that drives it through
//! `postMessage`. Requests become `ViewerCommand` events, and `ViewerEvent`s
//! are echoed back as notifications.
//!
//! ## Message Flow
//!
//! ```text
//! Host page                          Viewer
//!     │                                  │
//!     ├─ Request (with ID) ────────────> │
//!     │                                  ├─ ViewerCommand
//!     │ <─────────── Response (with ID) ─┤
//!     │                                  │
//!     │ <──── Notification (no ID) ──────┤ <─ ViewerEvent
//! ```
//!
//! ## Methods
//!
//! - `select_product` `{ "product": "guardanapo" | "base-mesa" | "toalha-retangular" }`
//! - `reset_view`
//! - `set_auto_rotate` `{ "enabled": bool }`
//! - `toggle_auto_rotate`
//! - `toggle_measures`
//! - `dispose_viewer`
//! - `get_viewer_state`
//!
//! Commands are rejected with `-32603` once the viewer has been disposed.
//! Unknown product ids give `-32602`, unknown methods `-32601`.
//!
//! ## Notifications
//!
//! `product_changed`, `measure_point`, `measure_cleared`,
//! `auto_rotate_changed`, `measures_visibility_changed` and `viewer_disposed`.

/// Request dispatch, notification queueing and the wasm message listener.
pub mod web_rpc;
