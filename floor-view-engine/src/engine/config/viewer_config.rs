use crate::engine::coordinates::DomainPosition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<LightSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes_helper: Option<AxesHelperSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<ControlsSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_image: Option<MapImageSection>,
}

impl ViewerConfig {
    /// A config with no sections at all does not start the viewer.
    pub fn is_empty(&self) -> bool {
        self.scene.is_none()
            && self.light.is_none()
            && self.grid.is_none()
            && self.axes_helper.is_none()
            && self.camera.is_none()
            && self.controls.is_none()
            && self.map_image.is_none()
    }

    pub fn display_camera_properties(&self) -> bool {
        self.camera
            .as_ref()
            .and_then(|c| c.display_camera_properties)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSection {
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightSection {
    pub ambient_light: Option<AmbientLightSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientLightSection {
    pub enabled: Option<bool>,
    pub color: Option<String>,
    pub intensity: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSection {
    pub enabled: Option<bool>,
    pub size: Option<f32>,
    pub primary_step_size: Option<f32>,
    pub secondary_step_size: Option<f32>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxesHelperSection {
    pub enabled: Option<bool>,
    pub size: Option<f32>,
}

/// Camera projection kind. Unrecognised strings deserialise to `Unknown`
/// and are resolved to the orthographic default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraKind {
    Perspective,
    Orthographic,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSection {
    #[serde(rename = "type", default)]
    pub kind: CameraKind,
    pub initial_position: Option<DomainPosition>,
    pub camera_settings: Option<CameraSettings>,
    pub display_camera_properties: Option<bool>,
}

/// Union of the perspective (`fov`, `near`, `far`) and orthographic
/// (`near`, `far`, `initialZoom`) settings shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSettings {
    pub fov: Option<f32>,
    pub near: Option<f32>,
    pub far: Option<f32>,
    pub initial_zoom: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlsKind {
    Orbit,
    Map,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsSection {
    #[serde(rename = "type", default)]
    pub kind: ControlsKind,
    pub orbit_control_settings: Option<OrbitControlSettings>,
    pub zoom_speed: Option<f32>,
    pub zoom_to_cursor: Option<bool>,
    pub enable_damping: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitControlSettings {
    pub enable_pan: Option<bool>,
    pub min_polar_angle: Option<f32>,
    pub max_polar_angle: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: f32,
    pub height: f32,
}

/// Background floor-plan image placed flat at `position` (its lower-left
/// corner in domain coordinates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapImageSection {
    pub position: DomainPosition,
    pub size: MapSize,
    pub camera_distance: f32,
    pub offset: f32,
    pub url: String,
    #[serde(default)]
    pub apply_map_limits: Option<bool>,
}

impl MapImageSection {
    /// Centre of the image rectangle in domain coordinates.
    pub fn centre(&self) -> DomainPosition {
        DomainPosition::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
            self.position.z,
        )
    }

    /// Image extents including the symmetric offset margin.
    pub fn padded_size(&self) -> (f32, f32) {
        (
            self.size.width + 2.0 * self.offset,
            self.size.height + 2.0 * self.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_json() {
        let json = r##"{
            "scene": { "backgroundColor": "#ffffff" },
            "camera": {
                "type": "orthographic",
                "initialPosition": { "x": 1000, "y": 2000, "z": 5000 },
                "cameraSettings": { "near": 0, "far": 50000, "initialZoom": 0.05 },
                "displayCameraProperties": true
            },
            "controls": { "type": "map", "zoomSpeed": 3 },
            "mapImage": {
                "position": { "x": 0, "y": 0, "z": -1 },
                "size": { "width": 40000, "height": 20000 },
                "cameraDistance": 10000,
                "offset": 500,
                "url": "maps/hall.png"
            }
        }"##;

        let config: ViewerConfig = serde_json::from_str(json).unwrap();
        let camera = config.camera.as_ref().unwrap();
        assert_eq!(camera.kind, CameraKind::Orthographic);
        assert_eq!(
            camera.initial_position,
            Some(DomainPosition::new(1000.0, 2000.0, 5000.0))
        );
        assert_eq!(
            camera.camera_settings.as_ref().unwrap().initial_zoom,
            Some(0.05)
        );
        assert!(config.display_camera_properties());
        assert_eq!(config.controls.as_ref().unwrap().kind, ControlsKind::Map);
        let map = config.map_image.as_ref().unwrap();
        assert_eq!(map.apply_map_limits, None);
        assert_eq!(map.centre(), DomainPosition::new(20000.0, 10000.0, -1.0));
        assert_eq!(map.padded_size(), (41000.0, 21000.0));
    }

    #[test]
    fn unknown_kinds_do_not_fail_parsing() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "camera": { "type": "fisheye" }, "controls": { "type": "fly" } }"#)
                .unwrap();
        assert_eq!(config.camera.unwrap().kind, CameraKind::Unknown);
        assert_eq!(config.controls.unwrap().kind, ControlsKind::Unknown);
    }

    #[test]
    fn missing_kinds_parse_as_unknown() {
        let config: ViewerConfig = serde_json::from_str(
            r#"{ "camera": { "initialPosition": { "x": 0, "y": 0, "z": 5000 } }, "controls": { "zoomSpeed": 2 } }"#,
        )
        .unwrap();
        let camera = config.camera.unwrap();
        assert_eq!(camera.kind, CameraKind::Unknown);
        assert_eq!(camera.initial_position, Some(DomainPosition::new(0.0, 0.0, 5000.0)));
        assert_eq!(config.controls.unwrap().kind, ControlsKind::Unknown);
    }

    #[test]
    fn empty_object_is_empty_config() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert!(config.is_empty());
        assert!(!config.display_camera_properties());
    }
}
