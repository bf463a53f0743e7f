use bevy::asset::AssetMetaCheck;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_common_assets::json::JsonAssetPlugin;

use crate::dashboard::DashboardPlugin;
use crate::dashboard::model::{DashboardConfig, StatusSnapshot};
use crate::engine::animation::tween::advance_tweens;
use crate::engine::camera::controls::update_viewer_controls;
use crate::engine::camera::projection::handle_viewport_resize;
use crate::engine::core::app_state::{
    RenderLoop, ViewerCommand, ViewerConfigInput, ViewerState, ViewerSurfaces, announce_viewer_state,
    count_render_ticks, flush_scene_buffer, handle_viewer_commands, ignore_late_viewer_config,
    initialise_viewer, receive_viewer_config, render_loop_running, teardown_viewer,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::buffer::SceneBuffer;
use crate::engine::scene::map_image::{MapImageLoader, spawn_map_image_when_loaded};
use crate::engine::scene::registry::ObjectRegistry;
use crate::engine::systems::telemetry::{CameraTelemetryText, update_camera_telemetry};
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::selection::SelectionPlugin;

/// Per-frame systems driven by the render loop, in the order they advance.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RenderLoopSet {
    Controls,
    Animation,
    Overlay,
}

/// Viewer lifecycle, scene bookkeeping and render-loop scheduling.
///
/// Input events and resources are registered here too so the plugin also
/// works on top of `MinimalPlugins`.
pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewerState>()
            .init_resource::<ViewerConfigInput>()
            .init_resource::<ViewerSurfaces>()
            .init_resource::<RenderLoop>()
            .init_resource::<ObjectRegistry>()
            .init_resource::<SceneBuffer>()
            .init_resource::<MapImageLoader>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_event::<ViewerCommand>()
            .add_event::<MouseMotion>()
            .add_event::<MouseWheel>()
            .add_event::<WindowResized>();

        app.add_systems(OnEnter(ViewerState::Initializing), initialise_viewer)
            .add_systems(OnEnter(ViewerState::Ready), flush_scene_buffer)
            .add_systems(OnEnter(ViewerState::Disposed), teardown_viewer);

        app.add_systems(
            Update,
            (
                receive_viewer_config.run_if(in_state(ViewerState::Uninitialized)),
                ignore_late_viewer_config.run_if(in_state(ViewerState::Ready)),
                announce_viewer_state.run_if(state_changed::<ViewerState>),
                handle_viewer_commands,
                spawn_map_image_when_loaded.run_if(in_state(ViewerState::Ready)),
                handle_viewport_resize,
            ),
        );

        app.configure_sets(
            Update,
            (
                RenderLoopSet::Controls,
                RenderLoopSet::Animation,
                RenderLoopSet::Overlay,
            )
                .chain()
                .run_if(render_loop_running),
        )
        .add_systems(
            Update,
            (count_render_ticks, update_viewer_controls).in_set(RenderLoopSet::Controls),
        )
        .add_systems(Update, advance_tweens.in_set(RenderLoopSet::Animation))
        .add_systems(Update, update_camera_telemetry.in_set(RenderLoopSet::Overlay));
    }
}

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(WireframePlugin::default())
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::BLACK,
        })
        // Dashboard layouts and status snapshots as loadable JSON assets.
        .add_plugins(JsonAssetPlugin::<DashboardConfig>::new(&["dashboard.json"]))
        .add_plugins(JsonAssetPlugin::<StatusSnapshot>::new(&["status.json"]))
        .add_plugins(ViewerPlugin)
        .add_plugins(DashboardPlugin)
        .add_plugins(SelectionPlugin)
        .add_plugins(WebRpcPlugin);

    app.add_systems(Startup, (bind_primary_window, create_overlays).chain());

    #[cfg(not(target_arch = "wasm32"))]
    {
        use crate::dashboard::loader::{forward_demo_feed, start_demo_feed};
        app.add_systems(Startup, start_demo_feed)
            .add_systems(Update, forward_demo_feed);
    }

    app
}

/// Inject the primary window as the viewer's viewport.
fn bind_primary_window(
    primary: Query<Entity, With<PrimaryWindow>>,
    mut surfaces: ResMut<ViewerSurfaces>,
) {
    if let Ok(window) = primary.single() {
        surfaces.viewport = Some(window);
    } else {
        warn!("No primary window, viewer has no viewport");
    }
}

fn create_overlays(mut commands: Commands, mut surfaces: ResMut<ViewerSurfaces>) {
    let telemetry = commands
        .spawn((
            Text::new(""),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Color::srgb(0.1, 0.1, 0.1)),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(12.0),
                left: Val::Px(12.0),
                ..default()
            },
            CameraTelemetryText,
        ))
        .id();
    surfaces.telemetry = Some(telemetry);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
