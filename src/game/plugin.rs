// src/game/plugin.rs
//! Bevy wiring for the orchestrator: startup, per-frame input and tick,
//! keyboard actions, pause, and scenery visuals.

use std::collections::HashMap;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::actions::{ActionState, PlayerAction};
use crate::config::{ConfigAssetPlugin, GameConfig, DEFAULT_CONFIG_PATH};
use crate::game::picking::BevyScene;
use crate::game::{Game, GameInitError, GameSet};
use crate::input::InputQueue;
use crate::scene::PropId;
use crate::setup::{self, MainCamera};
use crate::state::GameState;
use crate::terrain::TilesChanged;
use crate::ui;
use crate::unit::components::AppliedColor;

/// Never integrate camera movement over more than 50ms.
pub const MAX_CAMERA_DT: f32 = 0.05;

#[derive(Component, Copy, Clone, Debug)]
pub struct PropVisual(pub PropId);

#[derive(Resource, Default)]
pub struct PropEntities {
    pub spawned: HashMap<PropId, Entity>,
}

/// Handle to the settings asset the game is built from.
#[derive(Resource, Default)]
pub struct ConfigHandle(pub Handle<GameConfig>);

pub struct GamePlugin {
    /// Settings asset, relative to the asset root.
    pub config_path: String,
}

impl Default for GamePlugin {
    fn default() -> Self {
        Self { config_path: DEFAULT_CONFIG_PATH.to_string() }
    }
}

#[derive(Resource, Clone)]
struct ConfigPath(String);

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ConfigAssetPlugin)
            .insert_resource(ConfigPath(self.config_path.clone()))
            .init_resource::<ConfigHandle>()
            .init_state::<GameState>()
            .init_resource::<PropEntities>()
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Simulate, GameSet::Present).chain(),
            )
            .configure_sets(
                Update,
                GameSet::Input
                    .run_if(resource_exists::<Game>)
                    .run_if(in_state(GameState::Running)),
            )
            .configure_sets(
                Update,
                GameSet::Simulate
                    .run_if(resource_exists::<Game>)
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(
                Startup,
                (setup::setup, load_config, ui::spawn_mode_label),
            )
            .add_systems(
                Update,
                start_game
                    .run_if(not(resource_exists::<Game>))
                    .before(GameSet::Input),
            )
            .add_systems(
                Update,
                (process_pointer_input, apply_player_actions)
                    .chain()
                    .in_set(GameSet::Input),
            )
            .add_systems(
                Update,
                pause_toggle_system
                    .after(GameSet::Input)
                    .before(GameSet::Simulate)
                    .run_if(resource_exists::<Game>),
            )
            .add_systems(Update, advance_game.in_set(GameSet::Simulate))
            .add_systems(
                Update,
                (setup::apply_orbit_camera, sync_prop_visuals, ui::update_mode_label)
                    .in_set(GameSet::Present)
                    .run_if(resource_exists::<Game>),
            )
            .add_systems(OnEnter(GameState::Paused), ui::spawn_pause_overlay)
            .add_systems(OnExit(GameState::Paused), ui::despawn_pause_overlay);
    }
}

/// Startup: request the settings asset, store handle.
fn load_config(
    mut handle_res: ResMut<ConfigHandle>,
    path: Res<ConfigPath>,
    assets: Res<AssetServer>,
) {
    if handle_res.0.is_strong() { return; }
    handle_res.0 = assets.load(path.0.as_str());
    info!("Config: loading '{}'", path.0);
}

/// Settings once the asset has settled: the loaded document, or defaults
/// (with a warning) if it failed to load. `None` while still loading.
fn resolve_config(
    handle: &Handle<GameConfig>,
    configs: &Assets<GameConfig>,
    server: &AssetServer,
) -> Option<GameConfig> {
    if let Some(cfg) = configs.get(handle) {
        return Some(cfg.clone());
    }
    match server.load_state(handle) {
        LoadState::Failed(err) => {
            warn!("Config: {err}; falling back to defaults");
            Some(GameConfig::default())
        }
        _ => None,
    }
}

/// Build the game as soon as the settings are known. Without a camera
/// nothing can be picked or projected, so that is a startup failure.
pub fn start_game(
    mut commands: Commands,
    handle: Res<ConfigHandle>,
    configs: Res<Assets<GameConfig>>,
    server: Res<AssetServer>,
    cameras: Query<(), With<MainCamera>>,
    mut tiles_changed: EventWriter<TilesChanged>,
) -> Result {
    let Some(config) = resolve_config(&handle.0, &configs, &server) else {
        return Ok(());
    };
    if cameras.is_empty() {
        return Err(GameInitError::MissingSceneCamera.into());
    }
    let mut game = Game::new(&config)?;
    game.populate();
    game.start();
    tiles_changed.write(TilesChanged(game.stream_terrain()));
    commands.insert_resource(game);
    Ok(())
}

/// Feed this frame's pointer events through the dispatcher, then fire due timers.
pub fn process_pointer_input(
    mut game: ResMut<Game>,
    mut queue: ResMut<InputQueue>,
    time: Res<Time<Real>>,
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    let Ok((camera, transform)) = camera.single() else {
        queue.drain().for_each(drop);
        return;
    };
    let scene = BevyScene {
        camera,
        transform,
        pickables: game.pickables(),
        tile_size: game.terrain().tile_size(),
    };
    for event in queue.drain() {
        game.handle_pointer(&event, &scene);
    }
    game.advance_input(time.elapsed().as_millis() as u64, &scene);
}

pub fn apply_player_actions(
    time: Res<Time>,
    actions: Res<ActionState>,
    mut game: ResMut<Game>,
) {
    // Speeds are tuned per 60Hz frame.
    let frames = time.delta_secs().min(MAX_CAMERA_DT) * 60.0;
    let (move_speed, zoom_speed) = {
        let c = &game.config().camera;
        (c.key_move_speed, c.key_zoom_speed)
    };

    let cam = game.camera_mut();
    let (forward, right) = cam.ground_axes();
    let mut dir = Vec2::ZERO;
    if actions.pressed(PlayerAction::MoveForward) { dir += forward; }
    if actions.pressed(PlayerAction::MoveBackward) { dir -= forward; }
    if actions.pressed(PlayerAction::MoveLeft) { dir -= right; }
    if actions.pressed(PlayerAction::MoveRight) { dir += right; }
    if dir != Vec2::ZERO {
        cam.translate_target(dir.normalize() * move_speed * frames);
    }

    let step = cam.radius * zoom_speed * frames;
    if actions.pressed(PlayerAction::ZoomOut) { cam.zoom_by(step); }
    if actions.pressed(PlayerAction::ZoomIn) { cam.zoom_by(-step); }
    if actions.just_pressed(PlayerAction::ResetCamera) {
        cam.reset();
    }

    if actions.just_pressed(PlayerAction::ClearSelection) {
        game.clear_selection();
    }
    if actions.just_pressed(PlayerAction::ToggleSelectionMode) {
        game.toggle_selection_mode();
    }
}

pub fn pause_toggle_system(
    actions: Res<ActionState>,
    mut game: ResMut<Game>,
    mut next_state: ResMut<NextState<GameState>>,
    current_state: Res<State<GameState>>,
) {
    if !actions.just_pressed(PlayerAction::TogglePause) {
        return;
    }
    match current_state.get() {
        GameState::Running => {
            next_state.set(GameState::Paused);
            game.stop();
        }
        GameState::Paused => {
            next_state.set(GameState::Running);
            game.start();
        }
    }
}

pub fn advance_game(
    time: Res<Time>,
    mut game: ResMut<Game>,
    mut tiles_changed: EventWriter<TilesChanged>,
) {
    let changes = game.tick(time.delta_secs());
    if !changes.is_empty() {
        debug!("Terrain: +{} / -{} tiles", changes.created.len(), changes.removed.len());
        tiles_changed.write(TilesChanged(changes));
    }
}

/// Keep one rock entity per scenery object and mirror its selection colour.
pub fn sync_prop_visuals(
    mut commands: Commands,
    game: Res<Game>,
    mut entities: ResMut<PropEntities>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut visuals: Query<(&PropVisual, &MeshMaterial3d<StandardMaterial>, &mut AppliedColor)>,
) {
    let props = game.objects();

    entities.spawned.retain(|id, entity| {
        let alive = props.iter().any(|p| p.id == *id);
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });

    for (visual, material, mut applied) in &mut visuals {
        let Some(prop) = props.iter().find(|p| p.id == visual.0) else { continue };
        let color = prop.display_color();
        if applied.0 != color {
            if let Some(mat) = materials.get_mut(&material.0) {
                mat.base_color = color;
            }
            applied.0 = color;
        }
    }

    for prop in props {
        if entities.spawned.contains_key(&prop.id) {
            continue;
        }
        let color = prop.display_color();
        let e = commands
            .spawn((
                PropVisual(prop.id),
                AppliedColor(color),
                Mesh3d(meshes.add(Cuboid::new(prop.size.x, prop.size.y, prop.size.z))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color,
                    perceptual_roughness: 0.9,
                    ..default()
                })),
                Transform::from_translation(prop.position),
                Name::new(prop.name.clone()),
            ))
            .id();
        entities.spawned.insert(prop.id, e);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::asset::AssetPlugin;
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::selection::SelectionMode;
    use crate::unit::{Team, UnitKind};

    /// Headless app that builds the game from the settings asset at `path`.
    fn boot(path: &str) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), ConfigAssetPlugin))
            .add_event::<TilesChanged>()
            .add_systems(Update, start_game.run_if(not(resource_exists::<Game>)));
        app.world_mut().spawn(MainCamera);
        let handle = app.world().resource::<AssetServer>().load(path.to_string());
        app.insert_resource(ConfigHandle(handle));

        for _ in 0..2_000 {
            app.update();
            if app.world().contains_resource::<Game>() {
                return app;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("game was never built from '{path}'");
    }

    #[test]
    fn game_is_built_from_the_settings_asset() {
        let app = boot(DEFAULT_CONFIG_PATH);
        let game = app.world().resource::<Game>();
        assert!(game.is_running());
        assert_eq!(game.config().world_seed, 1337);
        assert_eq!(game.units().len(), 42);
    }

    #[test]
    fn missing_settings_asset_falls_back_to_defaults() {
        let app = boot("config/missing.config.ron");
        let game = app.world().resource::<Game>();
        assert_eq!(game.config(), &GameConfig::default());
        assert!(game.is_running());
    }

    fn world_with(game: Game, actions: ActionState) -> World {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(16));
        world.insert_resource(time);
        world.insert_resource(actions);
        world.insert_resource(game);
        world
    }

    fn held(actions: &[PlayerAction]) -> ActionState {
        let mut state = ActionState::default();
        for &action in actions {
            state.set(action, true);
        }
        state
    }

    #[test]
    fn keys_clear_selection_and_toggle_mode() {
        let mut game = Game::new(&GameConfig::default()).unwrap();
        let a = game.units_mut().spawn(UnitKind::Tank, Vec3::new(3.0, 0.5, 3.0), Team::Blue);
        game.units_mut().select(a);
        assert_eq!(game.selection_mode(), SelectionMode::Lasso);

        let mut world = world_with(
            game,
            held(&[PlayerAction::ClearSelection, PlayerAction::ToggleSelectionMode]),
        );
        world.run_system_once(apply_player_actions).unwrap();

        let game = world.resource::<Game>();
        assert!(!game.units().has_selection());
        assert_eq!(game.selection_mode(), SelectionMode::Rectangle);
    }

    #[test]
    fn held_keys_zoom_and_move_then_space_resets() {
        let game = Game::new(&GameConfig::default()).unwrap();
        let home = game.camera().clone();

        let mut world = world_with(game, held(&[PlayerAction::ZoomOut, PlayerAction::MoveForward]));
        world.run_system_once(apply_player_actions).unwrap();
        {
            let cam = world.resource::<Game>().camera();
            assert!(cam.radius > home.radius);
            assert!(cam.target != home.target);
        }

        {
            let mut actions = world.resource_mut::<ActionState>();
            actions.clear_just_pressed();
            actions.set(PlayerAction::ZoomOut, false);
            actions.set(PlayerAction::MoveForward, false);
            actions.set(PlayerAction::ResetCamera, true);
        }
        world.run_system_once(apply_player_actions).unwrap();
        assert_eq!(world.resource::<Game>().camera(), &home);
    }
}
