use bevy::prelude::*;
use constants::render_settings::{CLICK_DRAG_THRESHOLD_PX, SELECTED_OPACITY};

use super::ray::ray_hits_obb;
use crate::engine::camera::ViewerCamera;
use crate::engine::core::app_setup::RenderLoopSet;
use crate::engine::core::app_state::{ViewerState, ViewerSurfaces};
use crate::engine::scene::objects::ObjectBounds;
use crate::engine::scene::registry::ObjectRegistry;
use crate::rpc::web_rpc::WebRpcInterface;

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerGesture>()
            .init_resource::<SelectionState>()
            .add_systems(Update, select_on_click.in_set(RenderLoopSet::Controls))
            .add_systems(OnEnter(ViewerState::Disposed), clear_selection_state);
    }
}

/// Cursor position of the pending left press.
#[derive(Resource, Default, Debug)]
pub struct PointerGesture {
    press: Option<Vec2>,
}

#[derive(Resource, Default, Debug)]
pub struct SelectionState {
    pub selected: Option<Entity>,
}

#[derive(Component)]
pub struct Selected;

/// A release counts as a click only if the pointer stayed within the drag
/// threshold on both axes.
pub fn is_click(press: Vec2, release: Vec2) -> bool {
    let delta = release - press;
    delta.x.abs() < CLICK_DRAG_THRESHOLD_PX && delta.y.abs() < CLICK_DRAG_THRESHOLD_PX
}

pub fn pick_nearest(hits: impl IntoIterator<Item = (Entity, f32)>) -> Option<(Entity, f32)> {
    hits.into_iter()
        .filter(|(_, t)| *t >= 0.0)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Set a material's opacity, switching to blending below full opacity.
pub fn set_opacity(material: &mut StandardMaterial, alpha: f32) {
    material.base_color.set_alpha(alpha);
    material.alpha_mode = if alpha < 1.0 {
        AlphaMode::Blend
    } else {
        AlphaMode::Opaque
    };
}

pub fn select_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    surfaces: Res<ViewerSurfaces>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<ViewerCamera>>,
    pickables: Query<(Entity, &GlobalTransform, &ObjectBounds, &MeshMaterial3d<StandardMaterial>)>,
    registry: Res<ObjectRegistry>,
    mut gesture: ResMut<PointerGesture>,
    mut selection: ResMut<SelectionState>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rpc: ResMut<WebRpcInterface>,
    mut commands: Commands,
) {
    let Some(window) = surfaces.viewport.and_then(|e| windows.get(e).ok()) else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        gesture.press = window.cursor_position();
    }
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    let (Some(press), Some(release)) = (gesture.press.take(), window.cursor_position()) else {
        return;
    };
    if !is_click(press, release) {
        return;
    }

    if let Some(previous) = selection.selected.take() {
        if let Ok((_, _, _, material)) = pickables.get(previous) {
            if let Some(material) = materials.get_mut(&material.0) {
                set_opacity(material, 1.0);
            }
        }
        if let Ok(mut entity) = commands.get_entity(previous) {
            entity.remove::<Selected>();
        }
    }

    let Ok((camera, camera_xf)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_xf, release) else {
        return;
    };
    let origin = ray.origin;
    let dir = ray.direction.as_vec3();

    let hit = pick_nearest(
        pickables
            .iter()
            .filter_map(|(e, xf, ObjectBounds(size), _)| ray_hits_obb(origin, dir, xf, *size).map(|t| (e, t))),
    );

    let selected_id = match hit {
        Some((entity, _)) => {
            if let Ok((_, _, _, material)) = pickables.get(entity) {
                if let Some(material) = materials.get_mut(&material.0) {
                    set_opacity(material, SELECTED_OPACITY);
                }
            }
            commands.entity(entity).insert(Selected);
            selection.selected = Some(entity);
            let id = registry.id_of(entity).map(str::to_string);
            info!("Selected object {:?}", id);
            id
        }
        None => {
            debug!("Click hit no objects");
            None
        }
    };

    rpc.send_notification("object_selected", serde_json::json!({ "id": selected_id }));
}

fn clear_selection_state(mut selection: ResMut<SelectionState>, mut gesture: ResMut<PointerGesture>) {
    selection.selected = None;
    gesture.press = None;
}
