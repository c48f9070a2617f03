// src/scene.rs
//! Seam between the gameplay core and whatever renders it.
//! The core never holds engine handles; it names scene objects by opaque id.

use bevy::prelude::*; // Vec2, Vec3

use crate::terrain::TileKey;
use crate::unit::UnitId;

/// Identity of a non-unit scenery object (rocks etc.).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropId(pub u32);

/// Anything the render side can report under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneObjectId {
    Unit(UnitId),
    Prop(PropId),
    Terrain(TileKey),
}

/// Result of a successful raycast from screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub object: SceneObjectId,
    /// World-space intersection point.
    pub point: Vec3,
}

/// Queries the core needs from the render collaborator.
pub trait SceneQuery {
    /// Raycast through a screen point (pixels, origin top-left).
    fn pick(&self, screen: Vec2) -> Option<PickHit>;

    /// Project a world position to screen pixels; `None` when there is no
    /// active camera/viewport or the point cannot be projected.
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Top-down projection: world XZ maps straight to screen XY. Positions
    /// below the ground plane fail to project. Nothing is pickable.
    pub struct FlatProjection;

    impl SceneQuery for FlatProjection {
        fn pick(&self, _screen: Vec2) -> Option<PickHit> {
            None
        }

        fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
            (world.y >= 0.0).then(|| Vec2::new(world.x, world.z))
        }
    }
}
