// src/game/picking.rs
//! `SceneQuery` over a Bevy camera. Units and props pick as bounding spheres;
//! the ground is found by marching the ray against the exact height function.

use bevy::prelude::*;

use crate::scene::{PickHit, SceneObjectId, SceneQuery};
use crate::terrain::{elevation, TileKey};

/// Coarse march step along the pick ray, in world units.
const GROUND_MARCH_STEP: f32 = 1.0;
const GROUND_BISECT_ITERS: usize = 20;
/// Rays are not followed further than this.
const MAX_PICK_DISTANCE: f32 = 1_000.0;

/// Something clickable, approximated by a sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pickable {
    pub object: SceneObjectId,
    pub center: Vec3,
    pub radius: f32,
}

/// Nearest non-negative ray parameter hitting the sphere. `dir` must be unit length.
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = -b - sq;
    let t1 = -b + sq;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

/// First crossing of the ray with the terrain surface.
/// March to bracket the crossing, then bisect it.
pub fn ground_hit(origin: Vec3, dir: Vec3, tile_size: f32) -> Option<(f32, Vec3)> {
    let above = |t: f32| {
        let p = origin + dir * t;
        p.y - elevation::height_at(p.x, p.z, tile_size)
    };

    if above(0.0) <= 0.0 {
        return Some((0.0, origin));
    }

    let mut t_low = 0.0;
    let mut t_high = None;
    let mut t = GROUND_MARCH_STEP;
    while t <= MAX_PICK_DISTANCE {
        if above(t) <= 0.0 {
            t_high = Some(t);
            break;
        }
        t_low = t;
        t += GROUND_MARCH_STEP;
    }
    let mut t_high = t_high?;

    for _ in 0..GROUND_BISECT_ITERS {
        let mid = (t_low + t_high) * 0.5;
        if above(mid) > 0.0 {
            t_low = mid;
        } else {
            t_high = mid;
        }
    }
    Some((t_high, origin + dir * t_high))
}

/// Pick along an arbitrary world ray. Objects in front of the ground win.
pub fn pick_ray(origin: Vec3, dir: Vec3, pickables: &[Pickable], tile_size: f32) -> Option<PickHit> {
    let object_hit = pickables
        .iter()
        .filter_map(|p| ray_sphere(origin, dir, p.center, p.radius).map(|t| (t, p.object)))
        .min_by(|a, b| a.0.total_cmp(&b.0));
    let ground = ground_hit(origin, dir, tile_size);

    match (object_hit, ground) {
        (Some((t, object)), Some((tg, _))) if t <= tg => Some(PickHit { object, point: origin + dir * t }),
        (Some((t, object)), None) => Some(PickHit { object, point: origin + dir * t }),
        (_, Some((_, point))) => Some(PickHit {
            object: SceneObjectId::Terrain(TileKey::containing(point.x, point.z, tile_size)),
            point,
        }),
        (None, None) => None,
    }
}

/// Frame snapshot used to answer scene queries while the game is borrowed.
pub struct BevyScene<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
    pub pickables: Vec<Pickable>,
    pub tile_size: f32,
}

impl SceneQuery for BevyScene<'_> {
    fn pick(&self, screen: Vec2) -> Option<PickHit> {
        let ray = self.camera.viewport_to_world(self.transform, screen).ok()?;
        pick_ray(ray.origin, *ray.direction, &self.pickables, self.tile_size)
    }

    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        self.camera.world_to_viewport(self.transform, world).ok()
    }
}
