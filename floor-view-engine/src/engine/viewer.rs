//! Id-keyed scene operations shared by every caller that places or moves
//! objects: the dashboard reconciler, the RPC bridge and viewer commands.

use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::render_settings::MOVE_TWEEN_DURATION_MS;

use crate::engine::animation::tween::Tween;
use crate::engine::config::parse_colour;
use crate::engine::coordinates::DomainPosition;
use crate::engine::core::app_state::ViewerState;
use crate::engine::errors::ViewerError;
use crate::engine::scene::buffer::SceneBuffer;
use crate::engine::scene::objects::{SceneObject, SceneObjectId, SpawnContext, spawn_scene_object};
use crate::engine::scene::registry::{ObjectRegistry, RegisteredObject};

/// Outcome of a move request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Held until the viewer is ready.
    Buffered,
    /// Already at the target; no tween created.
    Unchanged,
    Started,
}

#[derive(SystemParam)]
pub struct Viewer<'w, 's> {
    commands: Commands<'w, 's>,
    registry: ResMut<'w, ObjectRegistry>,
    buffer: ResMut<'w, SceneBuffer>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    transforms: Query<'w, 's, &'static Transform, With<SceneObjectId>>,
    state: Res<'w, State<ViewerState>>,
}

impl Viewer<'_, '_> {
    pub fn is_ready(&self) -> bool {
        self.buffer.is_ready()
    }

    fn accepts_work(&self) -> bool {
        !matches!(self.state.get(), ViewerState::Disposed)
    }

    /// Insert object trees, or buffer them until the viewer is ready.
    pub fn add_objects(&mut self, objects: impl IntoIterator<Item = SceneObject>) {
        if !self.accepts_work() {
            warn!("Viewer disposed, ignoring add_objects");
            return;
        }
        for object in objects {
            if let Some(object) = self.buffer.enqueue_or_insert(object) {
                self.insert_now(&object);
            }
        }
    }

    /// Spawn a tree unless any of its names is already placed.
    fn insert_now(&mut self, object: &SceneObject) -> bool {
        if let Some(taken) = object.names().into_iter().find(|name| self.registry.contains(name)) {
            debug!("Object '{}' already in scene, skipping '{}'", taken, object.name);
            return false;
        }

        let mut ctx = SpawnContext {
            commands: &mut self.commands,
            meshes: &mut *self.meshes,
            materials: &mut *self.materials,
            registry: &mut *self.registry,
        };
        spawn_scene_object(&mut ctx, object, None);
        true
    }

    /// Placed object by id. Nothing is placed before the viewer is ready.
    pub fn get_object(&self, id: &str) -> Option<&RegisteredObject> {
        self.registry.find(id)
    }

    pub fn object_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether the id is placed or waiting in the buffer.
    pub fn is_known(&self, id: &str) -> bool {
        self.registry.contains(id) || self.buffer.has_pending(id)
    }

    fn local_translation(&self, object: &RegisteredObject) -> Vec3 {
        self.transforms
            .get(object.entity)
            .map(|t| t.translation)
            .unwrap_or(object.spawn_translation)
    }

    /// Current local position of a placed object in domain coordinates.
    pub fn object_position(&self, id: &str) -> Result<DomainPosition, ViewerError> {
        let object = self
            .registry
            .find(id)
            .ok_or_else(|| ViewerError::ObjectNotFound(id.to_string()))?;
        Ok(DomainPosition::from_render(self.local_translation(object)))
    }

    pub fn move_object(&mut self, id: &str, target: DomainPosition) -> Result<MoveOutcome, ViewerError> {
        self.move_object_with(id, target, Duration::from_millis(MOVE_TWEEN_DURATION_MS))
    }

    /// Tween an object to `target`. A move on an object that is already
    /// moving replaces the running tween.
    pub fn move_object_with(
        &mut self,
        id: &str,
        target: DomainPosition,
        duration: Duration,
    ) -> Result<MoveOutcome, ViewerError> {
        if !self.accepts_work() {
            return Ok(MoveOutcome::Unchanged);
        }
        if !self.buffer.enqueue_or_move(id, target) {
            return Ok(MoveOutcome::Buffered);
        }

        let object = self
            .registry
            .find(id)
            .ok_or_else(|| ViewerError::ObjectNotFound(id.to_string()))?;
        let entity = object.entity;
        let current = self.local_translation(object);
        let target = target.to_render();

        if current == target {
            self.commands.entity(entity).remove::<Tween>();
            return Ok(MoveOutcome::Unchanged);
        }
        self.commands.entity(entity).insert(Tween::new(target, duration));
        Ok(MoveOutcome::Started)
    }

    /// Recolour a beam in place, or patch it while it waits in the buffer.
    pub fn recolor_object(&mut self, id: &str, colour: &str) -> Result<(), ViewerError> {
        if self.buffer.recolor_pending(id, colour) {
            return Ok(());
        }
        let parsed = parse_colour(colour)
            .ok_or_else(|| ViewerError::InvalidConfig(format!("unrecognised colour '{colour}'")))?;
        self.registry.recolor(id, parsed, &mut self.materials)
    }

    /// Apply everything buffered before the viewer became ready. Later calls
    /// do nothing.
    pub fn flush_buffer(&mut self) -> usize {
        let Some(flushed) = self.buffer.flush() else {
            return 0;
        };
        let count = flushed.inserts.len() + flushed.moves.len();
        for object in &flushed.inserts {
            self.insert_now(object);
        }
        for pending in flushed.moves {
            if let Err(err) = self.move_object(&pending.id, pending.target) {
                warn!("Buffered move skipped: {}", err);
            }
        }
        count
    }
}
