use bevy::prelude::*;

use crate::engine::config::{CameraProjectionConfig, CameraSetup, MapImageSection};
use crate::engine::coordinates::DomainPosition;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraPlacement {
    fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: up_for(target - position),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, self.up)
    }
}

/// Straight-down views use -Z as up so domain +Y points up the screen.
fn up_for(direction: Vec3) -> Vec3 {
    if direction.normalize_or_zero().cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::NEG_Z
    } else {
        Vec3::Y
    }
}

/// Explicit initial position, then the background image centre, then a unit
/// height above the origin. Perspective cameras over a background image back
/// off to fit it unless an initial height was given.
pub fn initial_placement(
    camera: &CameraSetup,
    map: Option<&MapImageSection>,
    viewport: Vec2,
) -> CameraPlacement {
    let mut placement = match (camera.initial_position, map) {
        (Some(initial), _) => CameraPlacement::new(
            initial.to_render(),
            DomainPosition::new(initial.x, initial.y, 0.0).to_render(),
        ),
        (None, Some(map)) => {
            let centre = map.centre();
            CameraPlacement::new(
                centre.lifted(map.camera_distance).to_render(),
                centre.to_render(),
            )
        }
        (None, None) => CameraPlacement::new(Vec3::Y, Vec3::ZERO),
    };

    if let (CameraProjectionConfig::Perspective { fov_deg, .. }, Some(map)) = (camera.projection, map) {
        let explicit_height = camera.initial_position.map(|p| p.z).unwrap_or(0.0);
        if explicit_height == 0.0 {
            placement.position.y = map.position.z + perspective_fit_distance(map, aspect(viewport), fov_deg);
        }
    }

    placement
}

/// Orthographic zoom and, when map limits apply, the minimum zoom.
pub fn initial_zoom(camera: &CameraSetup, map: Option<&MapImageSection>, viewport: Vec2) -> (f32, Option<f32>) {
    let CameraProjectionConfig::Orthographic { initial_zoom, .. } = camera.projection else {
        return (1.0, None);
    };

    match (initial_zoom, map) {
        (Some(zoom), _) => (zoom, None),
        (None, Some(map)) => {
            let zoom = fit_zoom(map, viewport);
            let min_zoom = map.apply_map_limits.unwrap_or(false).then_some(zoom);
            (zoom, min_zoom)
        }
        (None, None) => (1.0, None),
    }
}

/// Largest zoom at which the padded image fits the viewport.
pub fn fit_zoom(map: &MapImageSection, viewport: Vec2) -> f32 {
    let (width, height) = map.padded_size();
    (viewport.x / width).min(viewport.y / height)
}

/// Camera distance at which the padded image fills the vertical field of
/// view, or the horizontal one when the image is relatively wider.
pub fn perspective_fit_distance(map: &MapImageSection, aspect: f32, fov_deg: f32) -> f32 {
    let (width, height) = map.padded_size();
    let content_aspect = width / height;
    let fit_height = if content_aspect > aspect {
        width / aspect
    } else {
        height
    };
    fit_height / (2.0 * (fov_deg.to_radians() / 2.0).tan())
}

fn aspect(viewport: Vec2) -> f32 {
    if viewport.y > 0.0 {
        viewport.x / viewport.y
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::viewer_config::MapSize;

    fn perspective() -> CameraSetup {
        CameraSetup {
            projection: CameraProjectionConfig::Perspective {
                fov_deg: 90.0,
                near: 1.0,
                far: 100_000.0,
            },
            initial_position: None,
            display_properties: false,
        }
    }

    fn orthographic(initial_zoom: Option<f32>) -> CameraSetup {
        CameraSetup {
            projection: CameraProjectionConfig::Orthographic {
                near: 0.0,
                far: 100_000.0,
                initial_zoom,
            },
            initial_position: None,
            display_properties: false,
        }
    }

    fn map(apply_limits: bool) -> MapImageSection {
        MapImageSection {
            position: DomainPosition::new(0.0, 0.0, 0.0),
            size: MapSize {
                width: 1800.0,
                height: 800.0,
            },
            camera_distance: 5000.0,
            offset: 100.0,
            url: "floor.png".into(),
            apply_map_limits: Some(apply_limits),
        }
    }

    #[test]
    fn default_perspective_camera_looks_down_at_origin() {
        let placement = initial_placement(&perspective(), None, Vec2::new(800.0, 600.0));
        assert_eq!(placement.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(placement.target, Vec3::ZERO);

        let transform = placement.transform();
        assert!(transform.forward().as_vec3().abs_diff_eq(Vec3::NEG_Y, 1e-5));
        assert!(transform.up().as_vec3().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn explicit_position_wins() {
        let mut camera = orthographic(None);
        camera.initial_position = Some(DomainPosition::new(100.0, 200.0, 3000.0));
        let placement = initial_placement(&camera, Some(&map(false)), Vec2::new(800.0, 600.0));
        assert_eq!(placement.position, Vec3::new(100.0, 3000.0, -200.0));
        assert_eq!(placement.target, Vec3::new(100.0, 0.0, -200.0));
    }

    #[test]
    fn centres_above_the_map() {
        let placement = initial_placement(&orthographic(None), Some(&map(false)), Vec2::new(800.0, 600.0));
        assert_eq!(placement.position, Vec3::new(900.0, 5000.0, -400.0));
        assert_eq!(placement.target, Vec3::new(900.0, 0.0, -400.0));
    }

    #[test]
    fn orthographic_zoom_priority() {
        let viewport = Vec2::new(1000.0, 500.0);
        assert_eq!(initial_zoom(&orthographic(Some(0.25)), Some(&map(true)), viewport), (0.25, None));
        // padded 2000 x 1000 -> min(0.5, 0.5)
        assert_eq!(initial_zoom(&orthographic(None), Some(&map(false)), viewport), (0.5, None));
        assert_eq!(initial_zoom(&orthographic(None), Some(&map(true)), viewport), (0.5, Some(0.5)));
        assert_eq!(initial_zoom(&orthographic(None), None, viewport), (1.0, None));
        assert_eq!(initial_zoom(&perspective(), Some(&map(true)), viewport), (1.0, None));
    }

    #[test]
    fn perspective_backs_off_to_fit_the_map() {
        // padded 2000 x 1000, square viewport: width-bound, fit height 2000,
        // fov 90 -> distance 1000
        let placement = initial_placement(&perspective(), Some(&map(false)), Vec2::new(600.0, 600.0));
        assert!((placement.position.y - 1000.0).abs() < 1e-2);

        let mut camera = perspective();
        camera.initial_position = Some(DomainPosition::new(0.0, 0.0, 7000.0));
        let placement = initial_placement(&camera, Some(&map(false)), Vec2::new(600.0, 600.0));
        assert_eq!(placement.position.y, 7000.0);
    }
}
