use std::collections::HashMap;

use bevy::prelude::*;

use crate::engine::errors::ViewerError;

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredObject {
    pub entity: Entity,
    /// Individual material of a beam. Groups and widget anchors have none.
    pub material: Option<Handle<StandardMaterial>>,
    /// Local translation at spawn, used until the entity's `Transform` is
    /// visible to queries.
    pub spawn_translation: Vec3,
}

/// Id-keyed index of every named node placed in the scene.
#[derive(Resource, Default, Debug)]
pub struct ObjectRegistry {
    objects: HashMap<String, RegisteredObject>,
}

impl ObjectRegistry {
    pub fn find(&self, id: &str) -> Option<&RegisteredObject> {
        self.objects.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Register `object` under `id`. Never overwrites: returns `false` and
    /// leaves the existing entry untouched when the id is taken.
    pub fn insert_if_absent(&mut self, id: impl Into<String>, object: RegisteredObject) -> bool {
        match self.objects.entry(id.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(object);
                true
            }
        }
    }

    /// Reverse lookup used by picking.
    pub fn id_of(&self, entity: Entity) -> Option<&str> {
        self.objects
            .iter()
            .find(|(_, object)| object.entity == entity)
            .map(|(id, _)| id.as_str())
    }

    /// Set the material colour in place, keeping the current opacity.
    pub fn recolor(
        &self,
        id: &str,
        colour: Color,
        materials: &mut Assets<StandardMaterial>,
    ) -> Result<(), ViewerError> {
        let object = self
            .find(id)
            .ok_or_else(|| ViewerError::ObjectNotFound(id.to_string()))?;
        let material = object
            .material
            .as_ref()
            .and_then(|handle| materials.get_mut(handle))
            .ok_or_else(|| ViewerError::NotRecolorable(id.to_string()))?;

        let alpha = material.base_color.alpha();
        material.base_color = colour.with_alpha(alpha);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
