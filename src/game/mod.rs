// src/game/mod.rs
//! The orchestrator: owns terrain, units, selection, camera and the input
//! dispatcher, and advances them once per frame.

pub mod picking;
mod plugin;
pub mod props;
pub mod roster;
mod target;

pub use plugin::GamePlugin;
pub use target::Battlefield;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::camera::OrbitCamera;
use crate::config::{ConfigLoadError, GameConfig};
use crate::game::picking::Pickable;
use crate::game::props::{scatter_rocks, SceneProp};
use crate::game::roster::{formation_positions, FORMATION, NEUTRAL_POSTS};
use crate::game::target::SceneTarget;
use crate::input::{InputDispatcher, PointerEvent};
use crate::scene::{PropId, SceneObjectId, SceneQuery};
use crate::selection::{SelectionController, SelectionMode};
use crate::terrain::{TerrainService, TileChanges};
use crate::unit::{Team, UnitRegistry};

/// Attempts made by `find_flat_positions` before giving up.
const FLAT_SEARCH_ATTEMPTS: usize = 100;
/// Spawned units stand this far above the ground.
const SPAWN_CLEARANCE: f32 = 0.5;
const SCENERY_SEED_SALT: u64 = 0x0005_CE7E_0000_0001;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Raw input into the dispatcher.
    Input,
    /// Unit movement and terrain streaming.
    Simulate,
    /// Copy game state onto entities.
    Present,
}

#[derive(thiserror::Error, Debug)]
pub enum GameInitError {
    #[error("configuration rejected: {0}")]
    InvalidConfig(#[from] ConfigLoadError),
    #[error("no main camera in the scene; nothing can be picked or projected")]
    MissingSceneCamera,
}

#[derive(Resource, Debug)]
pub struct Game {
    config: GameConfig,
    field: Battlefield,
    input: InputDispatcher,
    running: bool,
    rng: ChaCha8Rng,
}

impl Game {
    /// Empty world from a validated config. Call `populate` for the opening roster.
    pub fn new(config: &GameConfig) -> Result<Self, GameInitError> {
        config.validate()?;
        let field = Battlefield {
            terrain: TerrainService::new(&config.terrain),
            units: UnitRegistry::new(&config.units, config.world_seed),
            selection: SelectionController::default(),
            camera: OrbitCamera::from_config(&config.camera),
            props: Vec::new(),
            selected_prop: None,
            min_move_height: config.units.min_move_height,
            ground_offset: config.units.ground_offset,
        };
        Ok(Self {
            config: config.clone(),
            field,
            input: InputDispatcher::new(&config.input),
            running: false,
            rng: ChaCha8Rng::seed_from_u64(config.world_seed ^ SCENERY_SEED_SALT),
        })
    }

    /// Rocks, the two formations on the centre tile, and the neutral posts.
    pub fn populate(&mut self) {
        let tile_size = self.field.terrain.tile_size();
        let scenery = self.config.scenery.clone();

        let extent = tile_size * self.field.terrain.visible_radius() as f32 * 2.0;
        let first_id = self.field.props.iter().map(|p| p.id.0 + 1).max().unwrap_or(1);
        let mut rocks = scatter_rocks(&mut self.rng, scenery.rock_count, extent, scenery.rock_height, first_id);
        for rock in &mut rocks {
            rock.position.y += self.field.terrain.height_at(rock.position.x, rock.position.z);
        }
        self.field.props.extend(rocks);

        let units = &mut self.field.units;
        units.spawn_group(&FORMATION, &formation_positions(tile_size, false), Team::Blue);
        units.spawn_group(&FORMATION, &formation_positions(tile_size, true), Team::Red);

        for &(kind, post) in NEUTRAL_POSTS.iter().take(scenery.neutral_unit_count) {
            let position = self.neutral_position(post);
            self.field.units.spawn(kind, position, Team::Neutral);
        }

        info!(
            "Game: roster spawned ({} units, {} scenery objects)",
            self.field.units.len(),
            self.field.props.len()
        );
    }

    /// Post position if its tile is flat, otherwise a flat spot nearby.
    fn neutral_position(&mut self, post: Vec2) -> Vec3 {
        let terrain = &self.field.terrain;
        if terrain.is_flat_tile_at(post.x, post.y) {
            return Vec3::new(post.x, terrain.height_at(post.x, post.y) + SPAWN_CLEARANCE, post.y);
        }
        let reach = Vec2::splat(terrain.tile_size());
        match self.find_flat_positions(post - reach, post + reach, 1).first() {
            Some(&p) => p,
            None => {
                let h = self.field.terrain.height_at(post.x, post.y);
                Vec3::new(post.x, h + SPAWN_CLEARANCE, post.y)
            }
        }
    }

    /// Up to `count` random points in `[min, max)` that sit on flat tiles,
    /// raised to spawn height. May return fewer.
    pub fn find_flat_positions(&mut self, min: Vec2, max: Vec2, count: usize) -> Vec<Vec3> {
        let mut found = Vec::with_capacity(count);
        for _ in 0..FLAT_SEARCH_ATTEMPTS {
            if found.len() >= count {
                break;
            }
            let x = min.x + self.rng.random::<f32>() * (max.x - min.x);
            let z = min.y + self.rng.random::<f32>() * (max.y - min.y);
            if self.field.terrain.is_flat_tile_at(x, z) {
                let y = self.field.terrain.height_at(x, z) + SPAWN_CLEARANCE;
                found.push(Vec3::new(x, y, z));
            }
        }
        found
    }

    // ---------- Run state ----------

    pub fn start(&mut self) {
        if !self.running {
            info!("Game: running");
            self.release_pointers();
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("Game: stopped");
            self.release_pointers();
        }
        self.running = false;
    }

    /// No pointer stream reaches the dispatcher while stopped, so anything
    /// held across a stop is dropped along with its gesture.
    fn release_pointers(&mut self) {
        self.input.reset();
        self.field.selection.active_mut().cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One frame. Does nothing while stopped.
    pub fn tick(&mut self, dt: f32) -> TileChanges {
        if !self.running {
            return TileChanges::default();
        }
        self.field.units.tick(dt);
        self.stream_terrain()
    }

    /// Load and drop tiles around the camera eye.
    pub fn stream_terrain(&mut self) -> TileChanges {
        let eye = self.field.camera.eye();
        self.field.terrain.ensure_tiles_around(eye)
    }

    // ---------- Input ----------

    pub fn handle_pointer(&mut self, event: &PointerEvent, scene: &dyn SceneQuery) {
        let mut target = SceneTarget {
            field: &mut self.field,
            scene,
            pan_speed: self.config.input.pan_speed,
        };
        self.input.handle(event, &mut target);
    }

    /// Fire due timers against the clock.
    pub fn advance_input(&mut self, now_ms: u64, scene: &dyn SceneQuery) {
        let mut target = SceneTarget {
            field: &mut self.field,
            scene,
            pan_speed: self.config.input.pan_speed,
        };
        self.input.advance(now_ms, &mut target);
    }

    pub fn handle_left_click(&mut self, screen: Vec2, scene: &dyn SceneQuery) {
        self.field.left_click(screen, scene);
    }

    // ---------- Selection ----------

    pub fn selection_mode(&self) -> SelectionMode {
        self.field.selection.mode()
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.field.selection.set_mode(mode);
    }

    pub fn toggle_selection_mode(&mut self) -> SelectionMode {
        self.field.selection.toggle_mode()
    }

    pub fn select_object(&mut self, id: PropId) -> bool {
        self.field.select_object(id)
    }

    pub fn deselect_object(&mut self) {
        self.field.deselect_object();
    }

    pub fn selected_object(&self) -> Option<&SceneProp> {
        let id = self.field.selected_prop?;
        self.field.props.iter().find(|p| p.id == id)
    }

    pub fn objects(&self) -> &[SceneProp] {
        &self.field.props
    }

    /// Units and scenery both.
    pub fn clear_selection(&mut self) {
        self.field.clear_selection();
    }

    // ---------- Accessors ----------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainService {
        &self.field.terrain
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.field.units
    }

    pub fn units_mut(&mut self) -> &mut UnitRegistry {
        &mut self.field.units
    }

    pub fn selection(&self) -> &SelectionController {
        &self.field.selection
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.field.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.field.camera
    }

    pub fn input(&self) -> &InputDispatcher {
        &self.input
    }

    /// Pick spheres for every unit and scenery object.
    pub fn pickables(&self) -> Vec<Pickable> {
        let units = self.field.units.iter().map(|u| Pickable {
            object: SceneObjectId::Unit(u.id),
            center: u.position,
            radius: u.kind.stats().shape.bounding_radius(),
        });
        let props = self.field.props.iter().map(|p| Pickable {
            object: SceneObjectId::Prop(p.id),
            center: p.position,
            radius: p.bounding_radius(),
        });
        units.chain(props).collect()
    }

    /// Drop every unit, tile and scenery object. Returns the released tiles.
    pub fn dispose(&mut self) -> TileChanges {
        self.stop();
        self.field.selection.active_mut().cancel();
        self.field.units.clear();
        self.field.props.clear();
        self.field.selected_prop = None;
        let removed = self.field.terrain.dispose();
        TileChanges { created: Vec::new(), removed }
    }
}
