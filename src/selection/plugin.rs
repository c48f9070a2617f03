// src/selection/plugin.rs
//! Draws the active gesture: a UI node for the rectangle, a gizmo strip for
//! the lasso. Nothing is drawn once the gesture ends or is cancelled.

use bevy::prelude::*;

use crate::game::{Game, GameSet};
use crate::selection::strategy::GestureOverlay;
use crate::setup::MainCamera;

const FILL: Color = Color::srgba(0.2, 0.8, 0.3, 0.15);
const STROKE: Color = Color::srgba(0.3, 0.69, 0.31, 0.8);
/// Distance in front of the camera at which lasso vertices are placed.
const LASSO_DEPTH: f32 = 0.5;

#[derive(Component)]
pub struct RectangleOverlay;

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (rectangle_overlay_system, lasso_overlay_system)
                .in_set(GameSet::Present)
                .run_if(resource_exists::<Game>),
        );
    }
}

pub fn rectangle_overlay_system(
    mut commands: Commands,
    game: Res<Game>,
    mut existing: Query<(Entity, &mut Node), With<RectangleOverlay>>,
) {
    let rect = match game.selection().overlay() {
        Some(GestureOverlay::Rect(r)) => r,
        _ => {
            for (entity, _) in &existing {
                commands.entity(entity).despawn();
            }
            return;
        }
    };

    let size = rect.size();
    if let Ok((_, mut node)) = existing.single_mut() {
        node.left = Val::Px(rect.min.x);
        node.top = Val::Px(rect.min.y);
        node.width = Val::Px(size.x);
        node.height = Val::Px(size.y);
        return;
    }

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(rect.min.x),
            top: Val::Px(rect.min.y),
            width: Val::Px(size.x),
            height: Val::Px(size.y),
            border: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BackgroundColor(FILL),
        BorderColor(STROKE),
        RectangleOverlay,
    ));
}

pub fn lasso_overlay_system(
    game: Res<Game>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut gizmos: Gizmos,
) {
    let Some(GestureOverlay::Lasso(points)) = game.selection().overlay() else { return };
    let Ok((camera, cam_tf)) = cameras.single() else { return };

    let strip: Vec<Vec3> = points
        .iter()
        .filter_map(|&p| camera.viewport_to_world(cam_tf, p).ok())
        .map(|ray| ray.origin + *ray.direction * LASSO_DEPTH)
        .collect();
    if strip.len() >= 2 {
        gizmos.linestrip(strip, STROKE);
    }
}
