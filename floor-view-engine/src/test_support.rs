//! Headless app harness: no window backend, no renderer, fixed 100 ms ticks.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy::window::WindowResolution;

use crate::dashboard::DashboardPlugin;
use crate::engine::config::ViewerConfig;
use crate::engine::core::app_setup::ViewerPlugin;
use crate::engine::core::app_state::{ViewerConfigInput, ViewerSurfaces};
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::selection::SelectionPlugin;

pub const TICK: Duration = Duration::from_millis(100);

pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_asset::<Image>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
        .add_plugins((ViewerPlugin, DashboardPlugin, SelectionPlugin, WebRpcPlugin));
    app
}

pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Spawn a window entity and inject it as the viewer's viewport.
pub fn spawn_viewport(app: &mut App, width: f32, height: f32) -> Entity {
    let window = app
        .world_mut()
        .spawn(Window {
            resolution: WindowResolution::new(width, height),
            ..default()
        })
        .id();
    app.world_mut().resource_mut::<ViewerSurfaces>().viewport = Some(window);
    window
}

/// Headless app with a viewport and an orthographic viewer, already `Ready`.
pub fn ready_app() -> App {
    let mut app = headless_app();
    spawn_viewport(&mut app, 800.0, 600.0);
    let config: ViewerConfig =
        serde_json::from_str(r#"{ "camera": { "type": "orthographic" } }"#).unwrap();
    app.world_mut().insert_resource(ViewerConfigInput(Some(config)));
    run_ticks(&mut app, 4);
    app
}
