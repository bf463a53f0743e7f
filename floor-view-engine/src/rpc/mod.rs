//! JSON-RPC 2.0 communication layer for the hosting dashboard page.
//!
//! The engine runs inside an iframe; the host page pushes dashboard layouts
//! and status snapshots and can place or move objects directly. Messages
//! travel over `postMessage` as JSON strings.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Engine (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        ├─ Notification (no ID) ───────────────> ├─ Process, no reply
//!        │                                        │
//!        │ <────────── Notification (no ID) ──────┤
//! ```
//!
//! Incoming messages without an `id` are executed like requests but produce
//! no response, so status snapshots can be pushed fire-and-forget.
//!
//! ## Methods
//!
//! ### Dashboard
//! - `load_dashboard`: dashboard layout (also carries the viewer configuration)
//! - `push_status_snapshot`: `{ workStationsWithStatus, elementsWithStatus }`
//!
//! ### Scene
//! - `add_objects`: `{ objects: SceneObject[] }`, buffered until the viewer is ready
//! - `get_object`: `{ id }` → `{ id, found, pending, position? }`
//! - `move_object`: `{ id, x, y, z, durationMs? }` in domain millimetres
//!
//! ### Lifecycle
//! - `get_viewer_state`: current state, placed object count, render ticks
//! - `dispose_viewer`: tear the viewer down
//!
//! ## Notifications sent to the host
//! - `viewer_state_changed`: `{ state }`
//! - `viewer_error`: `{ message, fatal }`
//! - `object_selected`: `{ id }` (`null` when the selection is cleared)
//! - `workstation_overdue`: `{ id }`
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params, including unknown object ids
//! - `-32603`: Internal error

/// JSON-RPC 2.0 message types, the postMessage bridge and method handlers.
pub mod web_rpc;
