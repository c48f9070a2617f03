use bevy::prelude::*;

use skirmish::game::GamePlugin;
use skirmish::input::InputPlugin;
use skirmish::selection::SelectionPlugin;
use skirmish::terrain::TerrainPlugin;
use skirmish::unit::UnitPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Skirmish".into(),
                ..default()
            }),
            ..default()
        }))
        // your domain plugins
        .add_plugins(GamePlugin::default()) // settings asset, orchestrator, camera, pause, scenery
        .add_plugins(TerrainPlugin)    // streams tile meshes around the camera
        .add_plugins(UnitPlugin)       // one mesh per registry unit
        .add_plugins(SelectionPlugin)  // rectangle / lasso overlays
        .add_plugins(InputPlugin)      // mouse, touch, wheel and keys
        .run();
}
