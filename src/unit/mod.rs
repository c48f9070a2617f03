// src/unit/mod.rs

pub mod components;
pub mod kind;
mod plugin;
pub mod registry;
mod systems;

pub use kind::{Team, UnitKind, UnitShape, UnitStats};
pub use plugin::UnitPlugin;
pub use registry::{Unit, UnitId, UnitInfo, UnitRegistry};
