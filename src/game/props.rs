// src/game/props.rs
//! Selectable non-unit scenery (rocks).

use bevy::prelude::*;
use rand::Rng;

use crate::scene::PropId;
use crate::unit::kind::SELECTED_COLOR;

pub const ROCK_COLOR: Color = Color::srgb(0.4, 0.4, 0.4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    Rock,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneProp {
    pub id: PropId,
    pub kind: PropKind,
    pub name: String,
    pub position: Vec3,
    /// Full extents of the box.
    pub size: Vec3,
    pub original_color: Color,
    pub is_selected: bool,
}

impl SceneProp {
    pub fn display_color(&self) -> Color {
        if self.is_selected { SELECTED_COLOR } else { self.original_color }
    }

    pub fn bounding_radius(&self) -> f32 {
        self.size.length() * 0.5
    }
}

/// `count` rocks of random size, uniformly over a square of side `extent`
/// centred on the origin, resting at `height`.
pub fn scatter_rocks(rng: &mut impl Rng, count: usize, extent: f32, height: f32, first_id: u32) -> Vec<SceneProp> {
    (0..count)
        .map(|i| {
            let size = Vec3::new(
                rng.random::<f32>() * 0.3 + 0.1,
                rng.random::<f32>() * 0.2 + 0.05,
                rng.random::<f32>() * 0.3 + 0.1,
            );
            let x = (rng.random::<f32>() - 0.5) * extent;
            let z = (rng.random::<f32>() - 0.5) * extent;
            SceneProp {
                id: PropId(first_id + i as u32),
                kind: PropKind::Rock,
                name: format!("Rock {}", i + 1),
                position: Vec3::new(x, height, z),
                size,
                original_color: ROCK_COLOR,
                is_selected: false,
            }
        })
        .collect()
}
