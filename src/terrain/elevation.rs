// src/terrain/elevation.rs
//! Seed-free procedural elevation. Everything here is a pure function of
//! tile coordinates / world coordinates, so neighbours always agree.

/// Hash multipliers for the per-tile "has elevation" coin flip.
const TILE_HASH_X: i32 = 73_856_093;
const TILE_HASH_Z: i32 = 19_349_663;
/// Hash bucket (out of 100) below which a tile is elevated.
const ELEVATION_THRESHOLD: f64 = 30.0;

/// World units per unit of noise input.
const ELEVATION_SCALE: f32 = 30.0;
const ELEVATION_AMPLITUDE: f32 = 8.0;

/// Edge smoothing band, as fractions of the tile half-diagonal.
pub const FALLOFF_START: f32 = 0.3;
pub const FALLOFF_END: f32 = 0.4;

/// Tile (0,0) is reserved for spawning and is always flat.
pub fn should_tile_have_elevation(tile_x: i32, tile_z: i32) -> bool {
    if tile_x == 0 && tile_z == 0 {
        return false;
    }
    let hash = tile_x.wrapping_mul(TILE_HASH_X) ^ tile_z.wrapping_mul(TILE_HASH_Z);
    // Truncated remainder: negative buckets count as elevated.
    let bucket = ((hash as f64).sin() * 10_000.0) % 100.0;
    bucket < ELEVATION_THRESHOLD
}

/// Tile index along one axis for a world coordinate.
#[inline]
pub fn tile_index(world: f32, tile_size: f32) -> i32 {
    (world / tile_size).floor() as i32
}

/// True when the tile owning (world_x, world_z) is flat. Needs no terrain state.
pub fn is_flat_tile_at(world_x: f32, world_z: f32, tile_size: f32) -> bool {
    !should_tile_have_elevation(tile_index(world_x, tile_size), tile_index(world_z, tile_size))
}

/// Raw mountain function: four sine octaves, non-negative, scaled.
pub fn raw_elevation(world_x: f32, world_z: f32) -> f32 {
    let x = world_x / ELEVATION_SCALE;
    let z = world_z / ELEVATION_SCALE;

    let h = (x * 3.0).sin() * 0.6
        + (z * 2.0).sin() * 0.4
        + (x * 6.0 + z * 4.0).sin() * 0.3
        + (x * 12.0 + z * 8.0).sin() * 0.1;

    (h * ELEVATION_AMPLITUDE).max(0.0)
}

/// 1 inside the core of the tile, 0 on and near its border, smoothstep between.
/// `local` is the position inside the tile normalised to [0,1]^2.
pub fn edge_smoothing_factor(local_x: f32, local_z: f32) -> f32 {
    let dx = local_x - 0.5;
    let dz = local_z - 0.5;
    let half_diagonal = std::f32::consts::FRAC_1_SQRT_2;
    let r = (dx * dx + dz * dz).sqrt() / half_diagonal;

    if r <= FALLOFF_START {
        1.0
    } else if r >= FALLOFF_END {
        0.0
    } else {
        let t = (r - FALLOFF_START) / (FALLOFF_END - FALLOFF_START);
        1.0 - t * t * (3.0 - 2.0 * t)
    }
}

/// Height of tile (tile_x, tile_z) at a world position, whether or not the
/// position lies inside that tile. Mesh builders use this so a tile's far
/// border evaluates against its own centre.
pub fn tile_height(tile_x: i32, tile_z: i32, tile_size: f32, world_x: f32, world_z: f32) -> f32 {
    if !should_tile_have_elevation(tile_x, tile_z) {
        return 0.0;
    }
    let local_x = (world_x - tile_x as f32 * tile_size) / tile_size;
    let local_z = (world_z - tile_z as f32 * tile_size) / tile_size;
    let smooth = edge_smoothing_factor(local_x, local_z);
    if smooth == 0.0 {
        return 0.0;
    }
    raw_elevation(world_x, world_z) * smooth
}

/// Height at a world position, evaluated exactly (no mesh interpolation).
pub fn height_at(world_x: f32, world_z: f32, tile_size: f32) -> f32 {
    tile_height(
        tile_index(world_x, tile_size),
        tile_index(world_z, tile_size),
        tile_size,
        world_x,
        world_z,
    )
}
