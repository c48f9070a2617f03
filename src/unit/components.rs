// src/unit/components.rs
use bevy::prelude::*;

use crate::unit::registry::UnitId;

/// Render entity for a registry unit. One per `UnitId`.
#[derive(Component, Copy, Clone, Debug)]
pub struct UnitVisual(pub UnitId);

/// Colour last written to this entity's material, so we only touch assets on change.
#[derive(Component, Copy, Clone, Debug, PartialEq)]
pub struct AppliedColor(pub Color);
