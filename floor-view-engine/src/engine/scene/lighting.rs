use bevy::prelude::*;

use crate::engine::config::ResolvedViewerConfig;

/// Apply the scene background and ambient light. A disabled ambient light
/// leaves the scene unlit apart from unlit materials.
pub fn apply_scene_lighting(commands: &mut Commands, config: &ResolvedViewerConfig) {
    commands.insert_resource(ClearColor(config.background));

    match config.ambient_light {
        Some(ambient) => commands.insert_resource(AmbientLight {
            color: ambient.colour,
            brightness: ambient.intensity * 1000.0,
            ..default()
        }),
        None => commands.insert_resource(AmbientLight::NONE),
    }
}
