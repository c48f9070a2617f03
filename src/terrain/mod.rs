// src/terrain/mod.rs

pub mod components;
pub mod elevation;
pub mod mesh;
mod plugin;
pub mod tiles;

pub use plugin::{TerrainPlugin, TileEntities, TilesChanged};
pub use tiles::{TerrainService, Tile, TileChanges, TileKey};
