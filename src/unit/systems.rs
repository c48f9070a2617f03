// src/unit/systems.rs
//! Mirrors the registry into render entities: spawn, despawn, transform and
//! material colour, keyed 1:1 by `UnitId`.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::game::Game;
use crate::unit::components::{AppliedColor, UnitVisual};
use crate::unit::kind::{UnitKind, UnitShape};
use crate::unit::registry::UnitId;

#[derive(Resource, Default)]
pub struct UnitEntities {
    pub spawned: HashMap<UnitId, Entity>,
}

/// One shared mesh per kind.
#[derive(Resource)]
pub struct UnitMeshes(pub HashMap<UnitKind, Handle<Mesh>>);

pub fn shape_mesh(shape: UnitShape) -> Mesh {
    match shape {
        UnitShape::Box { width, height, depth } => Cuboid::new(width, height, depth).into(),
        UnitShape::Cylinder { height, diameter } => Cylinder::new(diameter * 0.5, height).into(),
    }
}

pub fn init_unit_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let table = UnitKind::ALL
        .iter()
        .map(|&kind| (kind, meshes.add(shape_mesh(kind.stats().shape))))
        .collect();
    commands.insert_resource(UnitMeshes(table));
}

pub fn sync_unit_visuals(
    mut commands: Commands,
    game: Res<Game>,
    unit_meshes: Option<Res<UnitMeshes>>,
    mut entities: ResMut<UnitEntities>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut visuals: Query<(
        &UnitVisual,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
        &mut AppliedColor,
    )>,
) {
    let Some(unit_meshes) = unit_meshes else { return };
    let units = game.units();

    // Despawn entities whose unit is gone.
    entities.spawned.retain(|id, entity| {
        let alive = units.contains(*id);
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });

    // Update survivors.
    for (visual, mut tf, material, mut applied) in &mut visuals {
        let Some(unit) = units.get(visual.0) else { continue };
        tf.translation = unit.position;
        tf.rotation = Quat::from_rotation_y(unit.facing_yaw);

        let color = unit.display_color();
        if applied.0 != color {
            if let Some(mat) = materials.get_mut(&material.0) {
                mat.base_color = color;
            }
            applied.0 = color;
        }
    }

    // Spawn newcomers.
    for unit in units.iter() {
        if entities.spawned.contains_key(&unit.id) {
            continue;
        }
        let Some(mesh) = unit_meshes.0.get(&unit.kind) else { continue };
        let color = unit.display_color();
        let material = materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.8,
            reflectance: 0.1,
            ..default()
        });
        let e = commands
            .spawn((
                UnitVisual(unit.id),
                AppliedColor(color),
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(unit.position)
                    .with_rotation(Quat::from_rotation_y(unit.facing_yaw)),
                Visibility::Visible,
                Name::new(format!("Unit #{} {} ({:?})", unit.id.0, unit.kind.name(), unit.team)),
            ))
            .id();
        entities.spawned.insert(unit.id, e);
    }
}
