// src/game/roster.rs
//! Opening layout: two mirrored formations on the flat centre tile and a ring
//! of neutral units further out.

use bevy::prelude::*;

use crate::unit::UnitKind;

/// Formation order, filled three columns per row.
pub const FORMATION: [UnitKind; 15] = [
    UnitKind::Infantry,
    UnitKind::Tank,
    UnitKind::Artillery,
    UnitKind::Cavalry,
    UnitKind::Scout,
    UnitKind::HeavyTank,
    UnitKind::AntiAir,
    UnitKind::Engineer,
    UnitKind::Medic,
    UnitKind::Sniper,
    UnitKind::Infantry,
    UnitKind::Tank,
    UnitKind::Cavalry,
    UnitKind::Scout,
    UnitKind::Artillery,
];

const FORMATION_COLUMNS: usize = 3;
const FORMATION_MARGIN: f32 = 2.0;
const FORMATION_SPACING: f32 = 3.0;
pub const SPAWN_HEIGHT: f32 = 0.5;

/// Formation inside the always-flat tile (0,0). Blue grows from its minimum
/// corner; red is the point mirror, growing from the maximum corner. The two
/// never share a column.
pub fn formation_positions(tile_size: f32, mirrored: bool) -> Vec<Vec3> {
    (0..FORMATION.len())
        .map(|k| {
            let col = (k % FORMATION_COLUMNS) as f32;
            let row = (k / FORMATION_COLUMNS) as f32;
            let offset = Vec2::new(
                FORMATION_MARGIN + FORMATION_SPACING * col,
                FORMATION_MARGIN + FORMATION_SPACING * row,
            );
            let xz = if mirrored { Vec2::splat(tile_size) - offset } else { offset };
            Vec3::new(xz.x, SPAWN_HEIGHT, xz.y)
        })
        .collect()
}

/// Neutral posts (kind, world XZ).
pub const NEUTRAL_POSTS: [(UnitKind, Vec2); 12] = [
    (UnitKind::Scout, Vec2::new(20.0, 20.0)),
    (UnitKind::Infantry, Vec2::new(-20.0, 20.0)),
    (UnitKind::Cavalry, Vec2::new(20.0, -20.0)),
    (UnitKind::Engineer, Vec2::new(-20.0, -20.0)),
    (UnitKind::Medic, Vec2::new(0.0, 30.0)),
    (UnitKind::Sniper, Vec2::new(0.0, -30.0)),
    (UnitKind::AntiAir, Vec2::new(30.0, 0.0)),
    (UnitKind::HeavyTank, Vec2::new(-30.0, 0.0)),
    (UnitKind::Artillery, Vec2::new(40.0, 40.0)),
    (UnitKind::Tank, Vec2::new(-40.0, 40.0)),
    (UnitKind::Infantry, Vec2::new(40.0, -40.0)),
    (UnitKind::Cavalry, Vec2::new(-40.0, -40.0)),
];
