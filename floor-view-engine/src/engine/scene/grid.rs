/// Floor grid covering the positive domain quadrant, primary lines drawn over
/// secondary ones.
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use constants::coordinate_system::to_render_space;

use super::ViewerOwned;
use crate::engine::config::GridSettings;

#[derive(Component)]
pub struct FloorGrid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub offset: f32,
    pub primary: bool,
}

/// Line offsets from the origin up to `size`, one entry per offset. An
/// offset on both step sizes is a primary line.
pub fn grid_lines(settings: &GridSettings) -> Vec<GridLine> {
    let mut lines: Vec<GridLine> = Vec::new();
    let on_step = |offset: f32, step: f32| {
        let ratio = offset / step;
        (ratio - ratio.round()).abs() < 1e-4
    };

    let secondary_count = (settings.size / settings.secondary_step).floor() as u32;
    for i in 0..=secondary_count {
        let offset = i as f32 * settings.secondary_step;
        lines.push(GridLine {
            offset,
            primary: on_step(offset, settings.primary_step),
        });
    }

    let primary_count = (settings.size / settings.primary_step).floor() as u32;
    for i in 0..=primary_count {
        let offset = i as f32 * settings.primary_step;
        if !on_step(offset, settings.secondary_step) {
            lines.push(GridLine {
                offset,
                primary: true,
            });
        }
    }

    lines.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    lines
}

/// Vertex positions and colours for a `LineList` mesh: two segments per
/// offset, one along domain X and one along domain Y.
pub fn grid_vertices(settings: &GridSettings) -> (Vec<[f32; 3]>, Vec<[f32; 4]>) {
    let primary = settings.primary_colour.to_linear().to_f32_array();
    let secondary = settings.secondary_colour.to_linear().to_f32_array();
    let size = settings.size;

    let mut positions = Vec::new();
    let mut colours = Vec::new();
    for line in grid_lines(settings) {
        let o = line.offset;
        for [x, y] in [[0.0, o], [size, o], [o, 0.0], [o, size]] {
            positions.push(to_render_space(x, y, 0.0).to_array());
        }
        let colour = if line.primary { primary } else { secondary };
        colours.extend([colour; 4]);
    }
    (positions, colours)
}

pub fn spawn_grid(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    settings: &GridSettings,
) {
    let (positions, colours) = grid_vertices(settings);
    let line_count = positions.len() / 2;

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colours);

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        Visibility::Visible,
        NoFrustumCulling,
        FloorGrid,
        ViewerOwned,
    ));
    debug!("Floor grid created with {} segments", line_count);
}
