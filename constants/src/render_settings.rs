/// Default duration of an object move tween in milliseconds.
pub const MOVE_TWEEN_DURATION_MS: u64 = 5000;

/// Pointer travel (px, per axis) beyond which a press is treated as a drag.
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 20.0;

/// Opacity applied to the selected object's material.
pub const SELECTED_OPACITY: f32 = 0.5;

pub const DEFAULT_BACKGROUND_COLOUR: &str = "white";

pub const DEFAULT_AMBIENT_COLOUR: &str = "white";
pub const DEFAULT_AMBIENT_INTENSITY: f32 = 1.0;

pub const DEFAULT_GRID_SIZE: f32 = 100_000.0;
pub const DEFAULT_GRID_PRIMARY_STEP: f32 = 10_000.0;
pub const DEFAULT_GRID_SECONDARY_STEP: f32 = 1000.0;
pub const DEFAULT_GRID_PRIMARY_COLOUR: &str = "black";
pub const DEFAULT_GRID_SECONDARY_COLOUR: &str = "#f3f3f3";

pub const DEFAULT_AXES_SIZE: f32 = 1.0;

pub const DEFAULT_PERSPECTIVE_FOV_DEG: f32 = 45.0;
pub const DEFAULT_PERSPECTIVE_NEAR: f32 = 1.0;
pub const DEFAULT_PERSPECTIVE_FAR: f32 = 100_000.0;
pub const DEFAULT_ORTHOGRAPHIC_NEAR: f32 = 0.0;
pub const DEFAULT_ORTHOGRAPHIC_FAR: f32 = 100_000.0;

pub const DEFAULT_ZOOM_SPEED: f32 = 2.0;

/// Colour of beam outlines.
pub const OUTLINE_COLOUR: &str = "black";
