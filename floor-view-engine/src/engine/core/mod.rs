//! Core application setup and viewer lifecycle.
//!
//! Handles app construction, the viewer state machine, window configuration
//! and the render-loop handle for both native and WASM targets.

/// Application setup and plugin configuration.
///
/// Creates the app with the viewer, dashboard, selection and RPC plugins.
pub mod app_setup;

/// Viewer state machine from configuration through initialisation to ready
/// and teardown.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
