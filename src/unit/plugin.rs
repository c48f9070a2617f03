// src/unit/plugin.rs
use bevy::prelude::*;

use crate::game::{Game, GameSet};
use crate::unit::systems::{init_unit_meshes, sync_unit_visuals, UnitEntities};

pub struct UnitPlugin;

impl Plugin for UnitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UnitEntities>()
            .add_systems(Startup, init_unit_meshes)
            .add_systems(
                Update,
                sync_unit_visuals
                    .in_set(GameSet::Present)
                    .run_if(resource_exists::<Game>),
            );
    }
}
