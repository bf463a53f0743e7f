//! Viewer camera: initial placement, projection upkeep and interactive controls.

/// Initial position, look target and zoom derived from the viewer config.
pub mod placement;

/// Projection construction and viewport resize handling.
pub mod projection;

/// Orbit and map style camera controls.
pub mod controls;

use bevy::prelude::*;

/// The single camera rendering the viewer scene.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ViewerCamera {
    /// Smallest orthographic zoom allowed when map limits are applied.
    pub min_zoom: Option<f32>,
}

impl ViewerCamera {
    /// Current zoom factor. Perspective cameras report 1.
    pub fn zoom(projection: &Projection) -> f32 {
        match projection {
            Projection::Orthographic(ortho) if ortho.scale > 0.0 => 1.0 / ortho.scale,
            _ => 1.0,
        }
    }
}
