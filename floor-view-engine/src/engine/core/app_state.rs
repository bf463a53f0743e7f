use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::window::WindowRef;

use crate::engine::camera::ViewerCamera;
use crate::engine::camera::controls::ViewerControls;
use crate::engine::camera::placement::{initial_placement, initial_zoom};
use crate::engine::camera::projection::build_projection;
use crate::engine::config::{ResolvedViewerConfig, ViewerConfig};
use crate::engine::coordinates::DomainPosition;
use crate::engine::errors::ViewerError;
use crate::engine::scene::ViewerOwned;
use crate::engine::scene::axes::spawn_axes;
use crate::engine::scene::buffer::SceneBuffer;
use crate::engine::scene::grid::spawn_grid;
use crate::engine::scene::lighting::apply_scene_lighting;
use crate::engine::scene::map_image::MapImageLoader;
use crate::engine::scene::objects::SceneObject;
use crate::engine::scene::registry::ObjectRegistry;
use crate::engine::viewer::Viewer;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewerState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    /// Initialisation failed; terminal for this viewer instance.
    Failed,
    Disposed,
}

impl ViewerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Disposed => "disposed",
        }
    }
}

/// Latest viewer configuration handed to the engine. Only the first
/// non-empty value is used.
#[derive(Resource, Default, Debug)]
pub struct ViewerConfigInput(pub Option<ViewerConfig>);

/// Configuration the running viewer was built from.
#[derive(Resource, Debug, Clone)]
pub struct ActiveViewerConfig(pub ResolvedViewerConfig);

/// Rendering surfaces injected by the embedding code.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct ViewerSurfaces {
    /// Window the viewer renders into and reads its size from.
    pub viewport: Option<Entity>,
    /// Text entity that receives camera telemetry.
    pub telemetry: Option<Entity>,
}

/// Stoppable handle over the per-frame viewer systems.
#[derive(Resource, Debug, Default)]
pub struct RenderLoop {
    running: bool,
    ticks: u64,
}

impl RenderLoop {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

pub fn render_loop_running(render_loop: Res<RenderLoop>) -> bool {
    render_loop.running
}

pub fn count_render_ticks(mut render_loop: ResMut<RenderLoop>) {
    render_loop.ticks += 1;
}

#[derive(Event, Debug, Clone)]
pub enum ViewerCommand {
    AddObjects(Vec<SceneObject>),
    MoveObject { id: String, target: DomainPosition },
    Dispose,
}

/// Start initialisation on the first non-empty configuration.
pub fn receive_viewer_config(
    input: Res<ViewerConfigInput>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    match &input.0 {
        Some(config) if !config.is_empty() => {
            info!("→ Viewer config received, initialising viewer");
            next_state.set(ViewerState::Initializing);
        }
        _ => {}
    }
}

pub fn ignore_late_viewer_config(input: Res<ViewerConfigInput>) {
    if input.is_changed() && !input.is_added() {
        warn!("Viewer already initialised, configuration change ignored");
    }
}

/// Required surfaces and config sections, checked before anything is spawned.
pub fn validate_viewer_inputs(
    input: &ViewerConfigInput,
    surfaces: &ViewerSurfaces,
    viewport_size: Option<Vec2>,
) -> Result<ResolvedViewerConfig, ViewerError> {
    let config = input
        .0
        .as_ref()
        .ok_or(ViewerError::MissingConfig("viewerConfig"))?;
    if surfaces.viewport.is_none() || viewport_size.is_none() {
        return Err(ViewerError::MissingSurface("viewport"));
    }
    if config.display_camera_properties() && surfaces.telemetry.is_none() {
        return Err(ViewerError::MissingSurface("camera properties"));
    }
    config.resolve()
}

pub fn initialise_viewer(
    mut commands: Commands,
    input: Res<ViewerConfigInput>,
    surfaces: Res<ViewerSurfaces>,
    windows: Query<&Window>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut map_loader: ResMut<MapImageLoader>,
    mut render_loop: ResMut<RenderLoop>,
    mut next_state: ResMut<NextState<ViewerState>>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    let viewport_size = surfaces
        .viewport
        .and_then(|e| windows.get(e).ok())
        .map(|w| Vec2::new(w.width(), w.height()));

    let config = match validate_viewer_inputs(&input, &surfaces, viewport_size) {
        Ok(config) => config,
        Err(err) => {
            error!("Viewer initialisation failed: {}", err);
            rpc.send_notification(
                "viewer_error",
                serde_json::json!({ "message": err.to_string(), "fatal": err.is_fatal() }),
            );
            next_state.set(ViewerState::Failed);
            return;
        }
    };
    let (Some(viewport), Some(viewport_size)) = (surfaces.viewport, viewport_size) else {
        return;
    };

    apply_scene_lighting(&mut commands, &config);
    if let Some(grid) = &config.grid {
        spawn_grid(&mut commands, &mut meshes, &mut materials, grid);
    }
    if let Some(size) = config.axes_size {
        spawn_axes(&mut commands, &mut meshes, &mut materials, size);
    }
    if let Some(map) = &config.map_image {
        map_loader.request(&asset_server, map);
    }

    spawn_viewer_camera(&mut commands, &config, viewport, viewport_size);

    commands.insert_resource(ActiveViewerConfig(config));
    render_loop.resume();
    info!("→ Viewer initialised, transitioning to Ready");
    next_state.set(ViewerState::Ready);
}

fn spawn_viewer_camera(
    commands: &mut Commands,
    config: &ResolvedViewerConfig,
    viewport: Entity,
    viewport_size: Vec2,
) -> Entity {
    let map = config.map_image.as_ref();
    let placement = initial_placement(&config.camera, map, viewport_size);
    let (zoom, min_zoom) = initial_zoom(&config.camera, map, viewport_size);

    let mut camera = commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Window(WindowRef::Entity(viewport)),
            clear_color: ClearColorConfig::Custom(config.background),
            ..default()
        },
        build_projection(&config.camera.projection, viewport_size, zoom),
        placement.transform(),
        ViewerCamera { min_zoom },
        IsDefaultUiCamera,
        ViewerOwned,
    ));
    if let Some(controls) = config.controls {
        camera.insert(ViewerControls::new(controls, placement.target));
    }
    camera.id()
}

pub fn flush_scene_buffer(mut viewer: Viewer) {
    let applied = viewer.flush_buffer();
    info!("→ Viewer ready, applied {} buffered operations", applied);
}

pub fn handle_viewer_commands(
    mut events: EventReader<ViewerCommand>,
    mut viewer: Viewer,
    state: Res<State<ViewerState>>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    for command in events.read() {
        match command {
            ViewerCommand::AddObjects(objects) => viewer.add_objects(objects.iter().cloned()),
            ViewerCommand::MoveObject { id, target } => {
                if let Err(err) = viewer.move_object(id, *target) {
                    warn!("Move skipped: {}", err);
                }
            }
            ViewerCommand::Dispose => {
                if *state.get() != ViewerState::Disposed {
                    next_state.set(ViewerState::Disposed);
                }
            }
        }
    }
}

/// Despawn everything the viewer created and drop all pending work.
pub fn teardown_viewer(
    mut commands: Commands,
    owned: Query<Entity, With<ViewerOwned>>,
    mut registry: ResMut<ObjectRegistry>,
    mut buffer: ResMut<SceneBuffer>,
    mut map_loader: ResMut<MapImageLoader>,
    mut render_loop: ResMut<RenderLoop>,
) {
    for entity in &owned {
        commands.entity(entity).despawn();
    }
    registry.clear();
    buffer.clear();
    map_loader.cancel();
    render_loop.stop();
    commands.remove_resource::<ActiveViewerConfig>();
    info!("→ Viewer disposed");
}

pub fn announce_viewer_state(state: Res<State<ViewerState>>, mut rpc: ResMut<WebRpcInterface>) {
    rpc.send_notification(
        "viewer_state_changed",
        serde_json::json!({ "state": state.get().as_str() }),
    );
}
