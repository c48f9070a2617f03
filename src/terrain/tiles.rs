// src/terrain/tiles.rs
//! Tile lattice + the streaming terrain service that owns every live tile.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::config::TerrainConfig;
use crate::terrain::elevation;

/// Integer lattice coordinate of a tile. Tile (x, z) spans
/// `[x*size, (x+1)*size) x [z*size, (z+1)*size)` in world XZ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    pub x: i32,
    pub z: i32,
}

impl TileKey {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Key of the tile owning a world position.
    #[inline]
    pub fn containing(world_x: f32, world_z: f32, tile_size: f32) -> Self {
        Self::new(
            elevation::tile_index(world_x, tile_size),
            elevation::tile_index(world_z, tile_size),
        )
    }

    /// World XZ of the tile's minimum corner.
    #[inline]
    pub fn origin(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.z as f32 * tile_size)
    }

    #[inline]
    pub fn center(self, tile_size: f32) -> Vec2 {
        self.origin(tile_size) + Vec2::splat(tile_size * 0.5)
    }

    /// Chebyshev distance in tiles.
    #[inline]
    pub fn ring_distance(self, other: TileKey) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// One generated tile. Flat tiles carry no heightfield.
#[derive(Clone, Debug)]
pub struct Tile {
    pub key: TileKey,
    /// World XZ of the minimum corner.
    pub origin: Vec2,
    pub size: f32,
    pub has_elevation: bool,
    pub subdivisions: u32,
    /// Row-major (z outer, x inner), `(subdivisions+1)^2` samples. Shared with
    /// mesh build tasks.
    heights: Option<Arc<[f32]>>,
}

impl Tile {
    pub fn generate(key: TileKey, size: f32, subdivisions: u32) -> Self {
        let has_elevation = elevation::should_tile_have_elevation(key.x, key.z);
        let origin = key.origin(size);

        let heights = has_elevation.then(|| {
            let n = subdivisions as usize + 1;
            let step = size / subdivisions as f32;
            let mut samples = Vec::with_capacity(n * n);
            for j in 0..n {
                let wz = origin.y + j as f32 * step;
                for i in 0..n {
                    let wx = origin.x + i as f32 * step;
                    samples.push(elevation::tile_height(key.x, key.z, size, wx, wz));
                }
            }
            Arc::from(samples)
        });

        Self { key, origin, size, has_elevation, subdivisions, heights }
    }

    /// Vertices per edge.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.subdivisions as usize + 1
    }

    /// Height of lattice vertex (i, j); 0 everywhere on a flat tile.
    pub fn vertex_height(&self, i: usize, j: usize) -> f32 {
        let n = self.resolution();
        match &self.heights {
            Some(h) if i < n && j < n => h[j * n + i],
            _ => 0.0,
        }
    }

    /// Cheap handle to the heightfield for off-thread mesh building.
    pub fn heights(&self) -> Option<Arc<[f32]>> {
        self.heights.clone()
    }

    pub fn max_height(&self) -> f32 {
        self.heights
            .as_deref()
            .map(|h| h.iter().copied().fold(0.0, f32::max))
            .unwrap_or(0.0)
    }
}

/// What a streaming update changed. Both lists are sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileChanges {
    pub created: Vec<TileKey>,
    pub removed: Vec<TileKey>,
}

impl TileChanges {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Owns every live tile. Created around the camera, dropped when out of range.
#[derive(Debug)]
pub struct TerrainService {
    tile_size: f32,
    subdivisions: u32,
    visible_radius: i32,
    tiles: HashMap<TileKey, Tile>,
    last_center: Option<TileKey>,
}

impl TerrainService {
    pub fn new(cfg: &TerrainConfig) -> Self {
        Self {
            tile_size: cfg.tile_size,
            subdivisions: cfg.subdivisions.max(1),
            visible_radius: cfg.visible_radius.max(0),
            tiles: HashMap::new(),
            last_center: None,
        }
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn visible_radius(&self) -> i32 {
        self.visible_radius
    }

    /// Make the live set exactly the tiles within `visible_radius` of the tile
    /// under `position`.
    pub fn ensure_tiles_around(&mut self, position: Vec3) -> TileChanges {
        let center = TileKey::containing(position.x, position.z, self.tile_size);
        if self.last_center == Some(center) {
            return TileChanges::default();
        }
        self.last_center = Some(center);

        let r = self.visible_radius;
        let mut changes = TileChanges::default();

        let mut removed: Vec<TileKey> = self
            .tiles
            .keys()
            .copied()
            .filter(|k| k.ring_distance(center) > r)
            .collect();
        removed.sort_unstable();
        for key in &removed {
            self.tiles.remove(key);
        }
        changes.removed = removed;

        for dz in -r..=r {
            for dx in -r..=r {
                let key = TileKey::new(center.x + dx, center.z + dz);
                if self.tiles.contains_key(&key) {
                    continue;
                }
                self.tiles.insert(key, Tile::generate(key, self.tile_size, self.subdivisions));
                changes.created.push(key);
            }
        }
        changes.created.sort_unstable();

        if !changes.is_empty() {
            debug!(
                "Terrain: centre ({},{}) +{} -{} tiles (live={})",
                center.x,
                center.z,
                changes.created.len(),
                changes.removed.len(),
                self.tiles.len()
            );
        }
        changes
    }

    /// Exact elevation at a world position. Independent of mesh resolution
    /// and of whether the owning tile is currently loaded.
    pub fn height_at(&self, world_x: f32, world_z: f32) -> f32 {
        elevation::height_at(world_x, world_z, self.tile_size)
    }

    pub fn is_flat_tile_at(&self, world_x: f32, world_z: f32) -> bool {
        elevation::is_flat_tile_at(world_x, world_z, self.tile_size)
    }

    /// Loaded tile owning a world position, if any.
    pub fn tile_at(&self, world_x: f32, world_z: f32) -> Option<&Tile> {
        self.tiles.get(&TileKey::containing(world_x, world_z, self.tile_size))
    }

    pub fn tile(&self, key: TileKey) -> Option<&Tile> {
        self.tiles.get(&key)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Release every tile. Returns the dropped keys, sorted.
    pub fn dispose(&mut self) -> Vec<TileKey> {
        let mut keys: Vec<TileKey> = self.tiles.drain().map(|(k, _)| k).collect();
        keys.sort_unstable();
        self.last_center = None;
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(radius: i32) -> TerrainService {
        TerrainService::new(&TerrainConfig { visible_radius: radius, subdivisions: 8, ..default() })
    }

    #[test]
    fn key_uses_floor_division() {
        assert_eq!(TileKey::containing(0.0, 0.0, 20.0), TileKey::new(0, 0));
        assert_eq!(TileKey::containing(19.99, 39.0, 20.0), TileKey::new(0, 1));
        assert_eq!(TileKey::containing(-0.01, -20.0, 20.0), TileKey::new(-1, -1));
    }

    #[test]
    fn first_update_creates_full_square() {
        let mut t = service(3);
        let changes = t.ensure_tiles_around(Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(changes.created.len(), 49);
        assert!(changes.removed.is_empty());
        assert_eq!(t.len(), 49);
        assert!(t.tile(TileKey::new(-3, 3)).is_some());
    }

    #[test]
    fn moving_one_tile_swaps_a_column() {
        let mut t = service(1);
        t.ensure_tiles_around(Vec3::new(10.0, 0.0, 10.0));
        let changes = t.ensure_tiles_around(Vec3::new(30.0, 0.0, 10.0));
        assert_eq!(
            changes.created,
            vec![TileKey::new(2, -1), TileKey::new(2, 0), TileKey::new(2, 1)]
        );
        assert_eq!(
            changes.removed,
            vec![TileKey::new(-1, -1), TileKey::new(-1, 0), TileKey::new(-1, 1)]
        );
        assert_eq!(t.len(), 9);
    }

    #[test]
    fn same_tile_twice_is_a_no_op() {
        let mut t = service(2);
        t.ensure_tiles_around(Vec3::ZERO);
        assert!(t.ensure_tiles_around(Vec3::new(3.0, 9.0, 4.0)).is_empty());
    }

    #[test]
    fn height_query_does_not_need_a_loaded_tile() {
        let t = service(1);
        assert!(t.tile_at(500.0, 500.0).is_none());
        let h = t.height_at(500.0, 500.0);
        assert_eq!(h, elevation::height_at(500.0, 500.0, 20.0));
    }

    #[test]
    fn flat_tiles_have_no_heightfield_and_borders_are_zero() {
        let mut t = service(4);
        t.ensure_tiles_around(Vec3::ZERO);
        for tile in t.tiles() {
            let n = tile.resolution();
            if !tile.has_elevation {
                assert!(tile.heights().is_none());
                assert_eq!(tile.max_height(), 0.0);
            }
            for k in 0..n {
                assert_eq!(tile.vertex_height(k, 0), 0.0);
                assert_eq!(tile.vertex_height(0, k), 0.0);
                assert_eq!(tile.vertex_height(k, n - 1), 0.0);
                assert_eq!(tile.vertex_height(n - 1, k), 0.0);
            }
        }
    }

    #[test]
    fn dispose_releases_everything() {
        let mut t = service(1);
        t.ensure_tiles_around(Vec3::ZERO);
        let gone = t.dispose();
        assert_eq!(gone.len(), 9);
        assert!(t.is_empty());
        // The next update rebuilds from scratch.
        assert_eq!(t.ensure_tiles_around(Vec3::ZERO).created.len(), 9);
    }
}
