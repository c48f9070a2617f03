// src/config.rs
//! Data-driven game settings + RON asset loader.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Asset path of the shipped settings, relative to the asset root.
pub const DEFAULT_CONFIG_PATH: &str = "config/skirmish.config.ron";

// ---------- Public plugin to register asset+loader ----------

pub struct ConfigAssetPlugin;

impl Plugin for ConfigAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<GameConfig>()
            .register_asset_loader(GameConfigLoader);
    }
}

// ---------- Sections ----------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World span of one square tile.
    pub tile_size: f32,
    /// Quads per tile edge in the generated heightfield.
    pub subdivisions: u32,
    /// Chebyshev radius (in tiles) kept alive around the camera.
    pub visible_radius: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self { tile_size: 20.0, subdivisions: 40, visible_radius: 3 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Side length of the square used to jitter move destinations.
    pub move_spread: f32,
    /// Snap distance for arrival.
    pub arrive_epsilon: f32,
    /// Click-to-move targets never go below this height.
    pub min_move_height: f32,
    /// Added to the picked ground height for move targets.
    pub ground_offset: f32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            move_spread: 2.0,
            arrive_epsilon: 0.1,
            min_move_height: 0.5,
            ground_offset: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub long_press_ms: u64,
    /// Used instead of `long_press_ms` once the device is known to be touch-capable.
    pub touch_long_press_ms: u64,
    /// Pixels a touch may wander before it is classified as drag or pan.
    pub touch_slop_px: f32,
    pub tap_max_distance_px: f32,
    pub tap_max_duration_ms: u64,
    /// Cooldown after a touch lifts before a new touch is accepted.
    pub touch_lock_ms: u64,
    /// Radians of orbit per pixel of pan drag.
    pub pan_speed: f32,
    /// Radius change per unit of wheel delta.
    pub wheel_zoom_speed: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            touch_long_press_ms: 800,
            touch_slop_px: 10.0,
            tap_max_distance_px: 15.0,
            tap_max_duration_ms: 500,
            touch_lock_ms: 200,
            pan_speed: 0.01,
            wheel_zoom_speed: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Initial yaw and its symmetric limit.
    pub yaw: f32,
    pub yaw_limit: f32,
    pub pitch: f32,
    /// Target translation per 60 Hz frame while a move key is held.
    pub key_move_speed: f32,
    /// Fraction of the radius added/removed per 60 Hz frame for R/Q zoom.
    pub key_zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 25.0,
            min_radius: 8.0,
            max_radius: 100.0,
            yaw: 0.0,
            yaw_limit: std::f32::consts::FRAC_PI_3,
            pitch: std::f32::consts::FRAC_PI_4,
            key_move_speed: 0.5,
            key_zoom_speed: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    pub rock_count: usize,
    pub rock_height: f32,
    pub neutral_unit_count: usize,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self { rock_count: 8, rock_height: 0.1, neutral_unit_count: 12 }
    }
}

// ---------- Root ----------

/// Everything tunable about a session. Missing fields fall back to defaults.
#[derive(Asset, TypePath, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seeds move jitter and scenery placement.
    pub world_seed: u64,
    pub terrain: TerrainConfig,
    pub units: UnitConfig,
    pub input: InputConfig,
    pub camera: CameraConfig,
    pub scenery: SceneryConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_seed: 1337,
            terrain: TerrainConfig::default(),
            units: UnitConfig::default(),
            input: InputConfig::default(),
            camera: CameraConfig::default(),
            scenery: SceneryConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a RON document and validate it.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigLoadError> {
        Self::from_ron_bytes(text.as_bytes())
    }

    pub fn from_ron_bytes(bytes: &[u8]) -> Result<Self, ConfigLoadError> {
        let cfg: GameConfig =
            ron::de::from_bytes(bytes).map_err(|e| ConfigLoadError::Ron(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let t = &self.terrain;
        if !(t.tile_size > 0.0) {
            return Err(ConfigLoadError::Invalid(format!(
                "terrain.tile_size must be positive, got {}",
                t.tile_size
            )));
        }
        if t.subdivisions == 0 {
            return Err(ConfigLoadError::Invalid("terrain.subdivisions must be at least 1".into()));
        }
        if t.visible_radius < 0 {
            return Err(ConfigLoadError::Invalid(format!(
                "terrain.visible_radius must not be negative, got {}",
                t.visible_radius
            )));
        }

        let c = &self.camera;
        if !(c.min_radius > 0.0) || c.min_radius > c.max_radius {
            return Err(ConfigLoadError::Invalid(format!(
                "camera radius range [{}, {}] is empty or non-positive",
                c.min_radius, c.max_radius
            )));
        }

        let i = &self.input;
        if i.touch_slop_px < 0.0 || i.tap_max_distance_px < 0.0 {
            return Err(ConfigLoadError::Invalid("input pixel thresholds must not be negative".into()));
        }

        if self.units.move_spread < 0.0 || self.units.arrive_epsilon < 0.0 {
            return Err(ConfigLoadError::Invalid("unit spread/epsilon must not be negative".into()));
        }
        Ok(())
    }
}

// ---------- Asset loader for `.config.ron` ----------

#[derive(Default)]
pub struct GameConfigLoader;

impl AssetLoader for GameConfigLoader {
    type Asset = GameConfig;
    type Settings = ();
    type Error = ConfigLoadError;

    fn extensions(&self) -> &[&str] {
        &["config.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let cfg = GameConfig::from_ron_bytes(&bytes)?;
        info!("Config: loaded '{}' (world_seed={})", load_context.path().display(), cfg.world_seed);
        Ok(cfg)
    }
}

// ---------- Errors ----------

#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error("I/O while reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}
