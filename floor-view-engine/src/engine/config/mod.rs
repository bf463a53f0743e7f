//! Declarative viewer configuration.
//!
//! The serde model mirrors the JSON the dashboard host sends (camelCase keys,
//! every section optional). Before the scene is built it is resolved into
//! exhaustive tagged unions with all defaults applied.

/// Serde model of the viewer configuration as received from the host.
pub mod viewer_config;

/// Defaults, colour parsing and camera/controls variant resolution.
pub mod resolved;

pub use resolved::{
    AmbientSettings, CameraProjectionConfig, CameraSetup, ControlMode, ControlsSetup, GridSettings,
    ResolvedViewerConfig, parse_colour,
};
pub use viewer_config::{MapImageSection, ViewerConfig};
