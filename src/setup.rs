use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::config::CameraConfig;
use crate::game::Game;

#[derive(Component)]
pub struct MainCamera;

pub fn setup(mut commands: Commands) {
    // 1) Light
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(30.0, 60.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        brightness: 300.0,
        ..default()
    });

    // 2) Camera at the default orbit; `apply_orbit_camera` takes over once the game exists
    let orbit = OrbitCamera::from_config(&CameraConfig::default());
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(orbit.eye()).looking_at(orbit.target, Vec3::Y),
        MainCamera,
    ));
}

/// Copy the game's orbit state onto the camera transform.
pub fn apply_orbit_camera(
    game: Res<Game>,
    mut query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut tf) = query.single_mut() else { return; };
    let orbit = game.camera();
    tf.translation = orbit.eye();
    tf.look_at(orbit.target, Vec3::Y);
}
