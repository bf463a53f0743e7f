use std::f32::consts::PI;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::ViewerCamera;
use crate::engine::config::{ControlMode, ControlsSetup};
use crate::engine::core::app_state::ViewerSurfaces;

const DAMPING_FACTOR: f32 = 0.05;
const POLAR_EPSILON: f32 = 1e-6;

/// Pointer-driven camera controls around a look target.
///
/// Orbit controls rotate with the left button and pan with the right one;
/// map controls pan with the left button and never rotate. Both zoom with
/// the wheel. With damping enabled accumulated input is released gradually
/// over the following ticks.
#[derive(Component, Debug, Clone)]
pub struct ViewerControls {
    pub setup: ControlsSetup,
    pub target: Vec3,
    rotate_delta: Vec2,
    pan_delta: Vec2,
}

impl ViewerControls {
    pub fn new(setup: ControlsSetup, target: Vec3) -> Self {
        Self {
            setup,
            target,
            rotate_delta: Vec2::ZERO,
            pan_delta: Vec2::ZERO,
        }
    }

    /// Portion of the accumulated deltas to apply this tick.
    fn take_deltas(&mut self) -> (Vec2, Vec2) {
        if self.setup.enable_damping {
            let rotate = self.rotate_delta * DAMPING_FACTOR;
            let pan = self.pan_delta * DAMPING_FACTOR;
            self.rotate_delta *= 1.0 - DAMPING_FACTOR;
            self.pan_delta *= 1.0 - DAMPING_FACTOR;
            if self.rotate_delta.length_squared() < 1e-10 {
                self.rotate_delta = Vec2::ZERO;
            }
            if self.pan_delta.length_squared() < 1e-6 {
                self.pan_delta = Vec2::ZERO;
            }
            (rotate, pan)
        } else {
            (
                std::mem::take(&mut self.rotate_delta),
                std::mem::take(&mut self.pan_delta),
            )
        }
    }
}

/// Spherical coordinates of a camera offset from its target (Y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Angle from +Y.
    pub polar: f32,
    /// Angle around Y measured from +Z.
    pub azimuth: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                polar: 0.0,
                azimuth: 0.0,
            };
        }
        Self {
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.radius * Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    /// Camera rotation looking back at the target along the offset.
    pub fn rotation(self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.azimuth, self.polar - PI / 2.0, 0.0)
    }
}

pub fn clamp_polar(polar: f32, min: f32, max: f32) -> f32 {
    polar.clamp(min.max(POLAR_EPSILON), max.min(PI - POLAR_EPSILON))
}

/// Scale applied per wheel step; below 1 zooms in.
pub fn zoom_step_scale(zoom_speed: f32, steps: f32) -> f32 {
    0.95_f32.powf(zoom_speed * steps)
}

/// World offset produced by dragging `delta_px` on screen. Map controls pan
/// on the ground plane, orbit controls in the screen plane.
pub fn pan_offset(mode: &ControlMode, rotation: Quat, delta_px: Vec2, units_per_px: f32) -> Vec3 {
    let right = rotation * Vec3::X;
    let up = match mode {
        ControlMode::Map => Vec3::Y.cross(right).normalize_or_zero(),
        ControlMode::Orbit { .. } => rotation * Vec3::Y,
    };
    (-right * delta_px.x + up * delta_px.y) * units_per_px
}

pub fn update_viewer_controls(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    surfaces: Res<ViewerSurfaces>,
    windows: Query<&Window>,
    mut cameras: Query<(
        &mut Transform,
        &mut Projection,
        &Camera,
        &GlobalTransform,
        &ViewerCamera,
        &mut ViewerControls,
    )>,
) {
    let mouse_delta: Vec2 = motion.read().map(|m| m.delta).sum();
    let scroll: f32 = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.01,
        })
        .sum();

    let Some(window) = surfaces.viewport.and_then(|e| windows.get(e).ok()) else {
        return;
    };
    let viewport = Vec2::new(window.width(), window.height());
    if viewport.y <= 0.0 {
        return;
    }

    for (mut transform, mut projection, camera, global, viewer_camera, mut controls) in &mut cameras {
        let orbit = matches!(controls.setup.mode, ControlMode::Orbit { .. });
        let pan_button = match controls.setup.mode {
            ControlMode::Orbit { enable_pan: true, .. } => Some(MouseButton::Right),
            ControlMode::Orbit { .. } => None,
            ControlMode::Map => Some(MouseButton::Left),
        };

        if orbit && buttons.pressed(MouseButton::Left) {
            controls.rotate_delta += mouse_delta * (2.0 * PI / viewport.y);
        }
        if pan_button.is_some_and(|b| buttons.pressed(b)) {
            controls.pan_delta += mouse_delta;
        }

        let (rotate, pan) = controls.take_deltas();
        let mut offset = transform.translation - controls.target;
        let mut rotation = transform.rotation;
        let mut changed = false;

        if rotate != Vec2::ZERO {
            if let ControlMode::Orbit {
                min_polar_angle,
                max_polar_angle,
                ..
            } = controls.setup.mode
            {
                let mut spherical = Spherical::from_offset(offset);
                spherical.azimuth -= rotate.x;
                spherical.polar = clamp_polar(spherical.polar - rotate.y, min_polar_angle, max_polar_angle);
                offset = spherical.to_offset();
                rotation = spherical.rotation();
                changed = true;
            }
        }

        if pan != Vec2::ZERO {
            let units = units_per_pixel(&projection, offset.length(), viewport);
            let shift = pan_offset(&controls.setup.mode, rotation, pan, units);
            controls.target += shift;
            changed = true;
        }

        if scroll.abs() > f32::EPSILON {
            let scale = zoom_step_scale(controls.setup.zoom_speed, scroll);
            let cursor_shift = if controls.setup.zoom_to_cursor {
                window
                    .cursor_position()
                    .and_then(|cursor| {
                        cursor_zoom_shift(&projection, camera, global, controls.target, cursor, viewport, scale)
                    })
                    .unwrap_or(Vec3::ZERO)
            } else {
                Vec3::ZERO
            };

            match projection.as_mut() {
                Projection::Orthographic(ortho) => {
                    let mut new_scale = ortho.scale * scale;
                    if let Some(min_zoom) = viewer_camera.min_zoom {
                        new_scale = new_scale.min(1.0 / min_zoom);
                    }
                    ortho.scale = new_scale;
                    let half = viewport * 0.5 * new_scale;
                    ortho.area = Rect::new(-half.x, -half.y, half.x, half.y);
                }
                _ => offset *= scale,
            }
            controls.target += cursor_shift;
            changed = true;
        }

        if changed {
            transform.translation = controls.target + offset;
            transform.rotation = rotation;
        }
    }
}

fn units_per_pixel(projection: &Projection, distance: f32, viewport: Vec2) -> f32 {
    match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        Projection::Perspective(perspective) => 2.0 * distance * (perspective.fov / 2.0).tan() / viewport.y,
        _ => 1.0,
    }
}

/// Target shift that keeps the point under the cursor fixed while zooming.
fn cursor_zoom_shift(
    projection: &Projection,
    camera: &Camera,
    global: &GlobalTransform,
    target: Vec3,
    cursor: Vec2,
    viewport: Vec2,
    scale: f32,
) -> Option<Vec3> {
    match projection {
        Projection::Orthographic(ortho) => {
            let from_centre = cursor - viewport * 0.5;
            let new_scale = ortho.scale * scale;
            let right = global.right().as_vec3();
            let up = global.up().as_vec3();
            Some((right * from_centre.x - up * from_centre.y) * (ortho.scale - new_scale))
        }
        _ => {
            let ray = camera.viewport_to_world(global, cursor).ok()?;
            let normal = global.forward().as_vec3();
            let denom = ray.direction.dot(normal);
            if denom.abs() < 1e-6 {
                return None;
            }
            let t = (target - ray.origin).dot(normal) / denom;
            let point = ray.origin + ray.direction * t;
            Some((point - target) * (1.0 - scale))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spherical_round_trip() {
        let offset = Vec3::new(300.0, 400.0, -200.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!(back.abs_diff_eq(offset, 1e-3));
    }

    #[test]
    fn rotation_looks_at_target() {
        let spherical = Spherical {
            radius: 10.0,
            polar: 1.0,
            azimuth: 0.7,
        };
        let forward = spherical.rotation() * Vec3::NEG_Z;
        let expected = -spherical.to_offset().normalize();
        assert!(forward.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn polar_angle_stays_above_the_floor() {
        let max = std::f32::consts::FRAC_PI_2;
        assert_eq!(clamp_polar(2.0, 0.0, max), max);
        assert_eq!(clamp_polar(-0.5, 0.0, max), POLAR_EPSILON);
        assert_eq!(clamp_polar(0.4, 0.0, max), 0.4);
    }

    #[test]
    fn zooming_in_shrinks_scale() {
        assert!(zoom_step_scale(2.0, 1.0) < 1.0);
        assert!(zoom_step_scale(2.0, -1.0) > 1.0);
        assert_eq!(zoom_step_scale(2.0, 0.0), 1.0);
    }

    #[test]
    fn map_pan_follows_the_pointer_on_the_floor() {
        // top-down camera, screen up = -Z
        let rotation = Spherical {
            radius: 1.0,
            polar: 0.0,
            azimuth: 0.0,
        }
        .rotation();
        let shift = pan_offset(&ControlMode::Map, rotation, Vec2::new(10.0, 0.0), 2.0);
        assert!(shift.abs_diff_eq(Vec3::new(-20.0, 0.0, 0.0), 1e-4));

        let shift = pan_offset(&ControlMode::Map, rotation, Vec2::new(0.0, 10.0), 1.0);
        assert!(shift.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-4));
        assert_eq!(shift.y, 0.0);
    }

    #[test]
    fn damping_releases_input_gradually() {
        let mut controls = ViewerControls::new(
            ControlsSetup {
                mode: ControlMode::Map,
                zoom_speed: 2.0,
                zoom_to_cursor: true,
                enable_damping: true,
            },
            Vec3::ZERO,
        );
        controls.pan_delta = Vec2::new(100.0, 0.0);
        let (_, first) = controls.take_deltas();
        assert!((first.x - 5.0).abs() < 1e-4);
        let (_, second) = controls.take_deltas();
        assert!(second.x < first.x);

        controls.setup.enable_damping = false;
        controls.pan_delta = Vec2::new(100.0, 0.0);
        let (_, all) = controls.take_deltas();
        assert_eq!(all.x, 100.0);
        assert_eq!(controls.pan_delta, Vec2::ZERO);
    }
}
