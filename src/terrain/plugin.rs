// src/terrain/plugin.rs
//! Bevy side of terrain streaming. The `TerrainService` inside `Game` decides
//! which tiles exist; this plugin builds their meshes off-thread and keeps one
//! entity per live tile.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::tasks::{futures::check_ready, AsyncComputeTaskPool, Task};

use crate::game::Game;
use crate::terrain::components::{Terrain, TerrainTile};
use crate::terrain::mesh::{build_tile_mesh, TileMeshInput, ELEVATED_COLOR, FLAT_COLOR};
use crate::terrain::tiles::{TileChanges, TileKey};

/// Emitted by the game tick whenever streaming created or dropped tiles.
#[derive(Event, Clone, Debug)]
pub struct TilesChanged(pub TileChanges);

// ---------- Resources ----------

/// Tile key -> spawned entity.
#[derive(Resource, Default)]
pub struct TileEntities {
    pub loaded: HashMap<TileKey, Entity>,
}

/// In-flight mesh builds, tagged with whether the tile is elevated.
#[derive(Resource, Default)]
pub struct AsyncTileLoader {
    pub tasks: HashMap<TileKey, (bool, Task<Mesh>)>,
}

#[derive(Resource)]
pub struct TerrainMaterials {
    pub flat: Handle<StandardMaterial>,
    pub elevated: Handle<StandardMaterial>,
}

pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TilesChanged>()
            .init_resource::<TileEntities>()
            .init_resource::<AsyncTileLoader>()
            .add_systems(Startup, init_terrain_materials)
            .add_systems(
                Update,
                (
                    schedule_tile_builds.run_if(resource_exists::<Game>),
                    receive_tile_meshes.after(schedule_tile_builds),
                ),
            );
    }
}

// ---------- Systems ----------

pub fn init_terrain_materials(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let flat = materials.add(StandardMaterial {
        base_color: FLAT_COLOR,
        perceptual_roughness: 0.95,
        ..default()
    });
    let elevated = materials.add(StandardMaterial {
        base_color: ELEVATED_COLOR,
        perceptual_roughness: 0.9,
        ..default()
    });
    commands.insert_resource(TerrainMaterials { flat, elevated });
}

/// Despawn dropped tiles, cancel their pending builds, and start builds for
/// new ones.
pub fn schedule_tile_builds(
    mut commands: Commands,
    mut events: EventReader<TilesChanged>,
    mut loader: ResMut<AsyncTileLoader>,
    mut entities: ResMut<TileEntities>,
    game: Res<Game>,
) {
    for TilesChanged(changes) in events.read() {
        for key in &changes.removed {
            if let Some(entity) = entities.loaded.remove(key) {
                commands.entity(entity).despawn();
            }
            loader.tasks.remove(key);
        }

        let pool = AsyncComputeTaskPool::get();
        for &key in &changes.created {
            if entities.loaded.contains_key(&key) || loader.tasks.contains_key(&key) {
                continue;
            }
            let Some(tile) = game.terrain().tile(key) else { continue };
            let input = TileMeshInput::from(tile);
            let elevated = tile.has_elevation;
            let task = pool.spawn(async move { build_tile_mesh(&input) });
            loader.tasks.insert(key, (elevated, task));
        }
    }
}

/// Spawn entities for finished builds.
pub fn receive_tile_meshes(
    mut commands: Commands,
    mut loader: ResMut<AsyncTileLoader>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut entities: ResMut<TileEntities>,
    materials: Option<Res<TerrainMaterials>>,
) {
    let Some(materials) = materials else { return };

    let mut finished: Vec<(TileKey, bool, Mesh)> = Vec::new();
    loader.tasks.retain(|&key, (elevated, task)| match check_ready(task) {
        None => true,
        Some(mesh) => {
            finished.push((key, *elevated, mesh));
            false
        }
    });

    for (key, elevated, mesh) in finished {
        let material = if elevated { materials.elevated.clone() } else { materials.flat.clone() };
        let e = commands
            .spawn((
                Terrain,
                TerrainTile(key),
                Transform::default(),
                Visibility::Visible,
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(material),
                Name::new(format!("Tile ({},{})", key.x, key.z)),
            ))
            .id();
        if let Some(stale) = entities.loaded.insert(key, e) {
            commands.entity(stale).despawn();
        }
    }
}
