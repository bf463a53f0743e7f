use bevy::prelude::*;
use constants::render_settings::*;

use super::viewer_config::{
    CameraKind, ControlsKind, MapImageSection, ViewerConfig,
};
use crate::engine::coordinates::DomainPosition;
use crate::engine::errors::ViewerError;

/// Camera projection with the settings that belong to that kind only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraProjectionConfig {
    Perspective { fov_deg: f32, near: f32, far: f32 },
    Orthographic { near: f32, far: f32, initial_zoom: Option<f32> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraSetup {
    pub projection: CameraProjectionConfig,
    pub initial_position: Option<DomainPosition>,
    pub display_properties: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMode {
    Orbit {
        enable_pan: bool,
        min_polar_angle: f32,
        max_polar_angle: f32,
    },
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsSetup {
    pub mode: ControlMode,
    pub zoom_speed: f32,
    pub zoom_to_cursor: bool,
    pub enable_damping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    pub size: f32,
    pub primary_step: f32,
    pub secondary_step: f32,
    pub primary_colour: Color,
    pub secondary_colour: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientSettings {
    pub colour: Color,
    pub intensity: f32,
}

/// Viewer configuration with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedViewerConfig {
    pub background: Color,
    pub ambient_light: Option<AmbientSettings>,
    pub grid: Option<GridSettings>,
    pub axes_size: Option<f32>,
    pub camera: CameraSetup,
    pub controls: Option<ControlsSetup>,
    pub map_image: Option<MapImageSection>,
}

impl ViewerConfig {
    /// Validate and fill defaults. A missing camera section is fatal; unknown
    /// camera or controls kinds fall back to orthographic / orbit.
    pub fn resolve(&self) -> Result<ResolvedViewerConfig, ViewerError> {
        let camera = self
            .camera
            .as_ref()
            .ok_or(ViewerError::MissingConfig("camera"))?;

        let settings = camera.camera_settings.clone().unwrap_or_default();
        let projection = match camera.kind {
            CameraKind::Perspective => {
                if settings.initial_zoom.is_some() {
                    warn!("cameraSettings.initialZoom ignored for a perspective camera");
                }
                CameraProjectionConfig::Perspective {
                    fov_deg: positive_or(settings.fov, DEFAULT_PERSPECTIVE_FOV_DEG),
                    near: positive_or(settings.near, DEFAULT_PERSPECTIVE_NEAR),
                    far: positive_or(settings.far, DEFAULT_PERSPECTIVE_FAR),
                }
            }
            CameraKind::Orthographic | CameraKind::Unknown => {
                if camera.kind == CameraKind::Unknown {
                    warn!("Unsupported camera type, falling back to orthographic");
                }
                if settings.fov.is_some() {
                    warn!("cameraSettings.fov ignored for an orthographic camera");
                }
                CameraProjectionConfig::Orthographic {
                    near: settings.near.unwrap_or(DEFAULT_ORTHOGRAPHIC_NEAR),
                    far: positive_or(settings.far, DEFAULT_ORTHOGRAPHIC_FAR),
                    initial_zoom: settings.initial_zoom.filter(|z| *z > 0.0),
                }
            }
        };

        if let Some(map) = &self.map_image {
            if map.size.width <= 0.0 || map.size.height <= 0.0 {
                return Err(ViewerError::InvalidConfig(format!(
                    "mapImage.size must be positive, got {}x{}",
                    map.size.width, map.size.height
                )));
            }
        }

        Ok(ResolvedViewerConfig {
            background: colour_or(
                self.scene.as_ref().and_then(|s| s.background_color.as_deref()),
                DEFAULT_BACKGROUND_COLOUR,
            ),
            ambient_light: self.resolve_ambient_light(),
            grid: self.resolve_grid(),
            axes_size: match &self.axes_helper {
                Some(axes) if axes.enabled == Some(false) => None,
                Some(axes) => Some(positive_or(axes.size, DEFAULT_AXES_SIZE)),
                None => Some(DEFAULT_AXES_SIZE),
            },
            camera: CameraSetup {
                projection,
                initial_position: camera.initial_position,
                display_properties: camera.display_camera_properties.unwrap_or(false),
            },
            controls: self.resolve_controls(),
            map_image: self.map_image.clone(),
        })
    }

    fn resolve_ambient_light(&self) -> Option<AmbientSettings> {
        let ambient = self.light.as_ref().and_then(|l| l.ambient_light.as_ref());
        if ambient.and_then(|a| a.enabled) == Some(false) {
            return None;
        }
        Some(AmbientSettings {
            colour: colour_or(
                ambient.and_then(|a| a.color.as_deref()),
                DEFAULT_AMBIENT_COLOUR,
            ),
            intensity: positive_or(ambient.and_then(|a| a.intensity), DEFAULT_AMBIENT_INTENSITY),
        })
    }

    fn resolve_grid(&self) -> Option<GridSettings> {
        let grid = self.grid.as_ref();
        if grid.and_then(|g| g.enabled) == Some(false) {
            return None;
        }
        Some(GridSettings {
            size: positive_or(grid.and_then(|g| g.size), DEFAULT_GRID_SIZE),
            primary_step: positive_or(grid.and_then(|g| g.primary_step_size), DEFAULT_GRID_PRIMARY_STEP),
            secondary_step: positive_or(
                grid.and_then(|g| g.secondary_step_size),
                DEFAULT_GRID_SECONDARY_STEP,
            ),
            primary_colour: colour_or(
                grid.and_then(|g| g.primary_color.as_deref()),
                DEFAULT_GRID_PRIMARY_COLOUR,
            ),
            secondary_colour: colour_or(
                grid.and_then(|g| g.secondary_color.as_deref()),
                DEFAULT_GRID_SECONDARY_COLOUR,
            ),
        })
    }

    fn resolve_controls(&self) -> Option<ControlsSetup> {
        let controls = self.controls.as_ref()?;
        let mode = match controls.kind {
            ControlsKind::Map => ControlMode::Map,
            ControlsKind::Orbit | ControlsKind::Unknown => {
                if controls.kind == ControlsKind::Unknown {
                    warn!("Unsupported controls type, falling back to orbit controls");
                }
                let orbit = controls.orbit_control_settings.clone().unwrap_or_default();
                // Explicit orbit controls never look from below the floor.
                let default_max = if controls.kind == ControlsKind::Orbit {
                    std::f32::consts::FRAC_PI_2
                } else {
                    std::f32::consts::PI
                };
                ControlMode::Orbit {
                    enable_pan: orbit.enable_pan.unwrap_or(true),
                    min_polar_angle: orbit.min_polar_angle.unwrap_or(0.0),
                    max_polar_angle: orbit.max_polar_angle.unwrap_or(default_max),
                }
            }
        };

        Some(ControlsSetup {
            mode,
            zoom_speed: positive_or(controls.zoom_speed, DEFAULT_ZOOM_SPEED),
            zoom_to_cursor: controls.zoom_to_cursor.unwrap_or(true),
            enable_damping: controls.enable_damping.unwrap_or(true),
        })
    }
}

fn positive_or(value: Option<f32>, default: f32) -> f32 {
    value.filter(|v| *v > 0.0).unwrap_or(default)
}

fn colour_or(value: Option<&str>, default: &str) -> Color {
    value
        .and_then(|raw| {
            let parsed = parse_colour(raw);
            if parsed.is_none() {
                warn!("Unrecognised colour '{}', using '{}'", raw, default);
            }
            parsed
        })
        .or_else(|| parse_colour(default))
        .unwrap_or(Color::WHITE)
}

/// Parse `#rgb`, `#rrggbb` (with or without `#`) or one of the CSS colour
/// names the dashboard uses.
pub fn parse_colour(raw: &str) -> Option<Color> {
    let value = raw.trim().to_ascii_lowercase();
    let named = match value.as_str() {
        "white" => Some(Color::WHITE),
        "black" => Some(Color::BLACK),
        "grey" | "gray" => Some(Color::srgb_u8(128, 128, 128)),
        "red" => Some(Color::srgb_u8(255, 0, 0)),
        "green" => Some(Color::srgb_u8(0, 128, 0)),
        "blue" => Some(Color::srgb_u8(0, 0, 255)),
        _ => None,
    };
    named.or_else(|| Srgba::hex(&value).ok().map(Color::Srgba))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> ViewerConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_camera_is_fatal() {
        let err = config(r#"{ "scene": {} }"#).resolve().unwrap_err();
        assert_eq!(err, ViewerError::MissingConfig("camera"));
        assert!(err.is_fatal());
    }

    #[test]
    fn defaults_fill_unspecified_fields() {
        let resolved = config(r#"{ "camera": { "type": "perspective" } }"#)
            .resolve()
            .unwrap();

        assert_eq!(resolved.background, Color::WHITE);
        let grid = resolved.grid.unwrap();
        assert_eq!(grid.size, 100_000.0);
        assert_eq!(grid.primary_step, 10_000.0);
        assert_eq!(grid.secondary_step, 1000.0);
        assert_eq!(grid.primary_colour, Color::BLACK);
        assert_eq!(resolved.axes_size, Some(1.0));
        assert!(resolved.controls.is_none());
        assert_eq!(
            resolved.camera.projection,
            CameraProjectionConfig::Perspective {
                fov_deg: 45.0,
                near: 1.0,
                far: 100_000.0
            }
        );
        let ambient = resolved.ambient_light.unwrap();
        assert_eq!(ambient.intensity, 1.0);
    }

    #[test]
    fn explicit_false_disables_helpers() {
        let resolved = config(
            r#"{
                "camera": { "type": "orthographic" },
                "grid": { "enabled": false },
                "axesHelper": { "enabled": false },
                "light": { "ambientLight": { "enabled": false } },
                "controls": { "type": "orbit", "zoomToCursor": false, "enableDamping": false }
            }"#,
        )
        .resolve()
        .unwrap();

        assert!(resolved.grid.is_none());
        assert!(resolved.axes_size.is_none());
        assert!(resolved.ambient_light.is_none());
        let controls = resolved.controls.unwrap();
        assert!(!controls.zoom_to_cursor);
        assert!(!controls.enable_damping);
        assert_eq!(controls.zoom_speed, 2.0);
    }

    #[test]
    fn unknown_kinds_fall_back() {
        let resolved = config(
            r#"{ "camera": { "type": "fisheye", "cameraSettings": { "initialZoom": 2 } },
                 "controls": { "type": "fly" } }"#,
        )
        .resolve()
        .unwrap();

        assert_eq!(
            resolved.camera.projection,
            CameraProjectionConfig::Orthographic {
                near: 0.0,
                far: 100_000.0,
                initial_zoom: Some(2.0)
            }
        );
        assert!(matches!(
            resolved.controls.unwrap().mode,
            ControlMode::Orbit { .. }
        ));
    }

    #[test]
    fn untyped_sections_fall_back() {
        let resolved = config(r#"{ "camera": {}, "controls": { "zoomSpeed": 2 } }"#)
            .resolve()
            .unwrap();

        assert!(matches!(
            resolved.camera.projection,
            CameraProjectionConfig::Orthographic { .. }
        ));
        assert!(matches!(
            resolved.controls.unwrap().mode,
            ControlMode::Orbit { .. }
        ));
    }

    #[test]
    fn orbit_controls_clamp_to_horizon() {
        let resolved = config(r#"{ "camera": { "type": "perspective" }, "controls": { "type": "orbit" } }"#)
            .resolve()
            .unwrap();
        match resolved.controls.unwrap().mode {
            ControlMode::Orbit { max_polar_angle, .. } => {
                assert_eq!(max_polar_angle, std::f32::consts::FRAC_PI_2)
            }
            ControlMode::Map => panic!("expected orbit controls"),
        }
    }

    #[test]
    fn rejects_degenerate_map_image() {
        let err = config(
            r#"{ "camera": { "type": "orthographic" },
                 "mapImage": { "position": { "x": 0, "y": 0, "z": 0 },
                               "size": { "width": 0, "height": 100 },
                               "cameraDistance": 100, "offset": 0, "url": "a.png" } }"#,
        )
        .resolve()
        .unwrap_err();
        assert!(matches!(err, ViewerError::InvalidConfig(_)));
    }

    #[test]
    fn parses_dashboard_colours() {
        assert_eq!(parse_colour("#e6f5d7"), Some(Color::srgb_u8(0xe6, 0xf5, 0xd7)));
        assert_eq!(parse_colour("#fff"), Some(Color::srgb_u8(255, 255, 255)));
        assert_eq!(parse_colour("Black"), Some(Color::BLACK));
        assert_eq!(parse_colour("not-a-colour"), None);
    }
}
