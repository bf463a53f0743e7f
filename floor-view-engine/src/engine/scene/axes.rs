use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;

use super::ViewerOwned;

#[derive(Component)]
pub struct AxesHelper;

/// Red X, green Y and blue Z segments of length `size` from the origin, in
/// render space.
pub fn axes_mesh(size: f32) -> Mesh {
    let positions = vec![
        [0.0, 0.0, 0.0],
        [size, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, size, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, size],
    ];
    let red = LinearRgba::RED.to_f32_array();
    let green = LinearRgba::GREEN.to_f32_array();
    let blue = LinearRgba::BLUE.to_f32_array();
    let colours = vec![red, red, green, green, blue, blue];

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colours);
    mesh
}

pub fn spawn_axes(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    size: f32,
) {
    commands.spawn((
        Mesh3d(meshes.add(axes_mesh(size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
        AxesHelper,
        ViewerOwned,
    ));
}
