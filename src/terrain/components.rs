// src/terrain/components.rs
use bevy::prelude::*;

use crate::terrain::tiles::TileKey;

/// Marker for all terrain-related entities.
#[derive(Component)]
pub struct Terrain;

/// Lattice key of the tile an entity renders.
#[derive(Component, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TerrainTile(pub TileKey);
