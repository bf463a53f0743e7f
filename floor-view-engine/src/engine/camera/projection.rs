use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::WindowResized;

use super::ViewerCamera;
use crate::engine::config::CameraProjectionConfig;
use crate::engine::core::app_state::ViewerSurfaces;

/// Projection for the configured camera kind at the given viewport size.
/// Orthographic cameras map one world unit to one pixel at zoom 1.
pub fn build_projection(config: &CameraProjectionConfig, viewport: Vec2, zoom: f32) -> Projection {
    match *config {
        CameraProjectionConfig::Perspective { fov_deg, near, far } => {
            Projection::Perspective(PerspectiveProjection {
                fov: fov_deg.to_radians(),
                aspect_ratio: aspect_ratio(viewport),
                near,
                far,
            })
        }
        CameraProjectionConfig::Orthographic { near, far, .. } => {
            let scale = if zoom > 0.0 { 1.0 / zoom } else { 1.0 };
            let mut ortho = OrthographicProjection {
                near,
                far,
                scale,
                scaling_mode: ScalingMode::WindowSize,
                ..OrthographicProjection::default_3d()
            };
            fit_orthographic_area(&mut ortho, viewport);
            Projection::Orthographic(ortho)
        }
    }
}

/// Keep the projection consistent with a new viewport size.
pub fn resize_projection(projection: &mut Projection, viewport: Vec2) {
    match projection {
        Projection::Perspective(perspective) => {
            perspective.aspect_ratio = aspect_ratio(viewport);
        }
        Projection::Orthographic(ortho) => fit_orthographic_area(ortho, viewport),
        _ => {}
    }
}

fn fit_orthographic_area(ortho: &mut OrthographicProjection, viewport: Vec2) {
    let half = viewport * 0.5 * ortho.scale;
    ortho.area = Rect::new(-half.x, -half.y, half.x, half.y);
}

fn aspect_ratio(viewport: Vec2) -> f32 {
    if viewport.y > 0.0 {
        viewport.x / viewport.y
    } else {
        1.0
    }
}

/// Recompute the viewer projection whenever the viewport window resizes.
pub fn handle_viewport_resize(
    mut resized: EventReader<WindowResized>,
    surfaces: Res<ViewerSurfaces>,
    mut cameras: Query<&mut Projection, With<ViewerCamera>>,
) {
    for event in resized.read() {
        if Some(event.window) != surfaces.viewport {
            continue;
        }
        let viewport = Vec2::new(event.width, event.height);
        for mut projection in &mut cameras {
            resize_projection(&mut projection, viewport);
        }
        debug!("Viewport resized to {}x{}", event.width, event.height);
    }
}
