// src/terrain/mesh.rs
//! Tile heightfield -> Bevy `Mesh`. Runs on the async compute pool, so it only
//! takes owned/Arc data.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, Mesh, PrimitiveTopology};

use crate::terrain::tiles::Tile;

/// Elevated tiles render gray, flat tiles grass-green.
pub const ELEVATED_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
pub const FLAT_COLOR: Color = Color::srgb(0.4, 0.6, 0.3);

/// Everything a build task needs, detached from the `TerrainService`.
#[derive(Clone, Debug)]
pub struct TileMeshInput {
    pub origin: Vec2,
    pub size: f32,
    pub subdivisions: u32,
    pub heights: Option<Arc<[f32]>>,
}

impl From<&Tile> for TileMeshInput {
    fn from(tile: &Tile) -> Self {
        Self {
            origin: tile.origin,
            size: tile.size,
            subdivisions: tile.subdivisions,
            heights: tile.heights(),
        }
    }
}

impl TileMeshInput {
    fn sample(&self, i: usize, j: usize) -> f32 {
        let n = self.subdivisions as usize + 1;
        match &self.heights {
            Some(h) => h[j.min(n - 1) * n + i.min(n - 1)],
            None => 0.0,
        }
    }
}

/// Build the tile mesh in world space. Flat tiles collapse to a single quad.
pub fn build_tile_mesh(input: &TileMeshInput) -> Mesh {
    let segments = if input.heights.is_some() { input.subdivisions.max(1) as usize } else { 1 };
    let n = segments + 1;
    let step = input.size / segments as f32;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n * n);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n * n);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n * n);

    for j in 0..n {
        for i in 0..n {
            let u = i as f32 / segments as f32;
            let v = j as f32 / segments as f32;
            let wx = input.origin.x + i as f32 * step;
            let wz = input.origin.y + j as f32 * step;
            let h = input.sample(i, j);

            // Central differences, one-sided on the border.
            let hl = input.sample(i.saturating_sub(1), j);
            let hr = input.sample((i + 1).min(n - 1), j);
            let hd = input.sample(i, j.saturating_sub(1));
            let hu = input.sample(i, (j + 1).min(n - 1));
            let span_x = ((i + 1).min(n - 1) - i.saturating_sub(1)).max(1) as f32 * step;
            let span_z = ((j + 1).min(n - 1) - j.saturating_sub(1)).max(1) as f32 * step;
            let normal = Vec3::new(-(hr - hl) / span_x, 1.0, -(hu - hd) / span_z).normalize_or_zero();

            positions.push([wx, h, wz]);
            normals.push(normal.to_array());
            uvs.push([u, v]);
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity(segments * segments * 6);
    for j in 0..segments {
        for i in 0..segments {
            let i0 = (j * n + i) as u32;
            let i1 = (j * n + i + 1) as u32;
            let i2 = ((j + 1) * n + i) as u32;
            let i3 = ((j + 1) * n + i + 1) as u32;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
