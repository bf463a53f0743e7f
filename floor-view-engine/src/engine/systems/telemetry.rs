use bevy::prelude::*;

use crate::engine::camera::ViewerCamera;
use crate::engine::core::app_state::{ActiveViewerConfig, ViewerSurfaces};

/// Default text overlay used as the telemetry surface.
#[derive(Component)]
pub struct CameraTelemetryText;

pub fn format_camera_properties(position: Vec3, rotation: Quat, zoom: f32) -> String {
    let (rx, ry, rz) = rotation.to_euler(EulerRot::XYZ);
    format!(
        "Camera Position: ({:.2}, {:.2}, {:.2}) | Rotation: ({:.2}, {:.2}, {:.2}) | Zoom: {:.4}",
        position.x, position.y, position.z, rx, ry, rz, zoom
    )
}

pub fn update_camera_telemetry(
    config: Option<Res<ActiveViewerConfig>>,
    surfaces: Res<ViewerSurfaces>,
    cameras: Query<(&Transform, &Projection), With<ViewerCamera>>,
    mut texts: Query<&mut Text>,
) {
    let Some(config) = config else {
        return;
    };
    if !config.0.camera.display_properties {
        return;
    }
    let Some(mut text) = surfaces.telemetry.and_then(|e| texts.get_mut(e).ok()) else {
        return;
    };
    let Ok((transform, projection)) = cameras.single() else {
        return;
    };

    text.0 = format_camera_properties(
        transform.translation,
        transform.rotation,
        ViewerCamera::zoom(projection),
    );
}
