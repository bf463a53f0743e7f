use bevy::pbr::wireframe::{Wireframe, WireframeColor};
use bevy::prelude::*;
use constants::dashboard::ELEMENT_COLOUR;
use constants::render_settings::OUTLINE_COLOUR;
use serde::{Deserialize, Serialize};

use super::ViewerOwned;
use super::registry::{ObjectRegistry, RegisteredObject};
use crate::engine::config::parse_colour;
use crate::engine::coordinates::DomainPosition;

/// Box dimensions in millimetres: `length` along domain X, `width` along
/// domain Y, `height` along domain Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamShape {
    pub length: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

impl BeamShape {
    /// Size of the box in render space.
    pub fn render_size(&self) -> Vec3 {
        Vec3::new(self.length, self.height, self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetAnchorShape {
    pub workstation_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Group,
    Beam(BeamShape),
    Widget(WidgetAnchorShape),
}

/// A named node of an object tree. `position` is the translation relative to
/// the parent, expressed in domain coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub position: DomainPosition,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    pub fn group(name: impl Into<String>, position: DomainPosition, children: Vec<SceneObject>) -> Self {
        Self {
            name: name.into(),
            position,
            kind: ObjectKind::Group,
            children,
        }
    }

    /// A box sitting in the positive quadrant of its parent: its corner at
    /// the parent origin, extending along +X, +Y and +Z in domain space.
    pub fn beam(name: impl Into<String>, length: f32, width: f32, height: f32, color: &str) -> Self {
        Self {
            name: name.into(),
            position: DomainPosition::new(length / 2.0, width / 2.0, height / 2.0),
            kind: ObjectKind::Beam(BeamShape {
                length,
                width,
                height,
                color: color.to_string(),
            }),
            children: Vec::new(),
        }
    }

    pub fn widget_anchor(name: impl Into<String>, position: DomainPosition, workstation_id: &str) -> Self {
        Self {
            name: name.into(),
            position,
            kind: ObjectKind::Widget(WidgetAnchorShape {
                workstation_id: workstation_id.to_string(),
            }),
            children: Vec::new(),
        }
    }

    /// Names of this node and all descendants, depth first.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        for child in &self.children {
            names.extend(child.names());
        }
        names
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }
}

/// Id of a registered scene node.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct SceneObjectId(pub String);

/// Render-space extents of a pickable box, centred on the entity origin.
#[derive(Component, Debug, Clone, Copy)]
pub struct ObjectBounds(pub Vec3);

/// Screen-space status widget anchor for a workstation.
#[derive(Component, Debug, Clone)]
pub struct WidgetAnchor {
    pub workstation_id: String,
}

pub struct SpawnContext<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub registry: &'a mut ObjectRegistry,
}

/// Spawn an object tree and register every node. Returns the root entity.
/// Callers check for name collisions first.
pub fn spawn_scene_object(ctx: &mut SpawnContext, object: &SceneObject, parent: Option<Entity>) -> Entity {
    let translation = object.position.to_render();
    let mut entity = ctx.commands.spawn((
        Name::new(object.name.clone()),
        SceneObjectId(object.name.clone()),
        Transform::from_translation(translation),
        Visibility::default(),
    ));

    match parent {
        Some(parent) => {
            entity.insert(ChildOf(parent));
        }
        None => {
            entity.insert(ViewerOwned);
        }
    }

    let material = match &object.kind {
        ObjectKind::Group => None,
        ObjectKind::Beam(shape) => {
            let colour = parse_colour(&shape.color).unwrap_or_else(|| {
                warn!(
                    "Beam '{}' has unrecognised colour '{}', using element colour",
                    object.name, shape.color
                );
                parse_colour(ELEMENT_COLOUR).unwrap_or(Color::WHITE)
            });
            let size = shape.render_size();
            let material = ctx.materials.add(StandardMaterial {
                base_color: colour,
                unlit: true,
                ..default()
            });
            entity.insert((
                Mesh3d(ctx.meshes.add(Cuboid::new(size.x, size.y, size.z))),
                MeshMaterial3d(material.clone()),
                ObjectBounds(size),
                Wireframe,
                WireframeColor {
                    color: parse_colour(OUTLINE_COLOUR).unwrap_or(Color::BLACK),
                },
            ));
            Some(material)
        }
        ObjectKind::Widget(anchor) => {
            entity.insert(WidgetAnchor {
                workstation_id: anchor.workstation_id.clone(),
            });
            None
        }
    };

    let id = entity.id();
    if !ctx.registry.insert_if_absent(
        object.name.clone(),
        RegisteredObject {
            entity: id,
            material,
            spawn_translation: translation,
        },
    ) {
        warn!("Duplicate object name '{}' inside one tree", object.name);
    }

    for child in &object.children {
        spawn_scene_object(ctx, child, Some(id));
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beam_sits_in_positive_quadrant() {
        let beam = SceneObject::beam("ws-1", 4000.0, 1000.0, 800.0, "#bfbfbf");
        assert_eq!(beam.position.to_render(), Vec3::new(2000.0, 400.0, -500.0));
        match &beam.kind {
            ObjectKind::Beam(shape) => {
                assert_eq!(shape.render_size(), Vec3::new(4000.0, 800.0, 1000.0))
            }
            other => panic!("expected beam, got {other:?}"),
        }
    }

    #[test]
    fn names_cover_whole_tree() {
        let tree = SceneObject::group(
            "station-1",
            DomainPosition::ORIGIN,
            vec![
                SceneObject::beam("1", 1.0, 1.0, 1.0, "grey"),
                SceneObject::widget_anchor("widget-1", DomainPosition::ORIGIN, "1"),
            ],
        );
        assert_eq!(tree.names(), vec!["station-1", "1", "widget-1"]);
    }

    #[test]
    fn deserialises_host_objects() {
        let json = r##"{
            "name": "group-el-1",
            "position": { "x": 100, "y": 200, "z": 0 },
            "children": [
                { "name": "el-1",
                  "kind": { "type": "beam", "length": 6000, "width": 300, "height": 200, "color": "#c7b02c" } }
            ]
        }"##;
        let object: SceneObject = serde_json::from_str(json).unwrap();
        assert_eq!(object.kind, ObjectKind::Group);
        assert!(matches!(object.children[0].kind, ObjectKind::Beam(_)));
    }
}
