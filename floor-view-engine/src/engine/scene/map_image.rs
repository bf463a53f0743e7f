use bevy::asset::LoadState;
use bevy::prelude::*;

use super::ViewerOwned;
use crate::engine::config::MapImageSection;

#[derive(Component)]
pub struct MapImagePlane;

/// Background image requested during initialisation. The plane is spawned
/// once the texture is available; the viewer never waits for it.
#[derive(Resource, Default)]
pub struct MapImageLoader {
    pending: Option<(Handle<Image>, MapImageSection)>,
}

impl MapImageLoader {
    pub fn request(&mut self, asset_server: &AssetServer, section: &MapImageSection) {
        info!("Loading background image {}", section.url);
        let handle = asset_server.load::<Image>(section.url.clone());
        self.pending = Some((handle, section.clone()));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

pub fn spawn_map_image_when_loaded(
    mut loader: ResMut<MapImageLoader>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some((handle, _)) = loader.pending.as_ref() else {
        return;
    };

    match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => {
            let Some((handle, section)) = loader.pending.take() else {
                return;
            };
            commands.spawn(map_image_bundle(&section, handle, &mut meshes, &mut materials));
            info!("✓ Background image placed");
        }
        Some(LoadState::Failed(err)) => {
            warn!("Background image failed to load: {}", err);
            loader.pending = None;
        }
        _ => {}
    }
}

fn map_image_bundle(
    section: &MapImageSection,
    texture: Handle<Image>,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> impl Bundle {
    let half_size = Vec2::new(section.size.width / 2.0, section.size.height / 2.0);
    (
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, half_size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(texture),
            unlit: true,
            ..default()
        })),
        Transform::from_translation(section.centre().to_render()),
        MapImagePlane,
        ViewerOwned,
    )
}
