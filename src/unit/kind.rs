// src/unit/kind.rs
//! Closed set of unit kinds and teams, with their fixed stat table.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Renderable primitive for a unit kind. Dimensions in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnitShape {
    Box { width: f32, height: f32, depth: f32 },
    Cylinder { height: f32, diameter: f32 },
}

impl UnitShape {
    pub fn height(self) -> f32 {
        match self {
            UnitShape::Box { height, .. } | UnitShape::Cylinder { height, .. } => height,
        }
    }

    /// Radius of a sphere around the shape centre, used for picking.
    pub fn bounding_radius(self) -> f32 {
        match self {
            UnitShape::Box { width, height, depth } => {
                0.5 * (width * width + height * height + depth * depth).sqrt()
            }
            UnitShape::Cylinder { height, diameter } => 0.5 * (height * height + diameter * diameter).sqrt(),
        }
    }
}

/// Fixed per-kind stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitStats {
    /// Distance per 60 Hz tick.
    pub speed: f32,
    pub health: f32,
    pub shape: UnitShape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Infantry,
    Tank,
    Artillery,
    Cavalry,
    Scout,
    HeavyTank,
    AntiAir,
    Engineer,
    Medic,
    Sniper,
}

impl UnitKind {
    pub const ALL: [UnitKind; 10] = [
        UnitKind::Infantry,
        UnitKind::Tank,
        UnitKind::Artillery,
        UnitKind::Cavalry,
        UnitKind::Scout,
        UnitKind::HeavyTank,
        UnitKind::AntiAir,
        UnitKind::Engineer,
        UnitKind::Medic,
        UnitKind::Sniper,
    ];

    pub const fn stats(self) -> UnitStats {
        use UnitShape::{Box, Cylinder};
        match self {
            UnitKind::Infantry => UnitStats {
                speed: 0.15,
                health: 100.0,
                shape: Box { width: 0.3, height: 0.6, depth: 0.3 },
            },
            UnitKind::Tank => UnitStats {
                speed: 0.12,
                health: 300.0,
                shape: Box { width: 0.8, height: 0.4, depth: 1.2 },
            },
            UnitKind::Artillery => UnitStats {
                speed: 0.08,
                health: 150.0,
                shape: Cylinder { height: 0.6, diameter: 0.5 },
            },
            UnitKind::Cavalry => UnitStats {
                speed: 0.25,
                health: 120.0,
                shape: Box { width: 0.4, height: 0.8, depth: 0.6 },
            },
            UnitKind::Scout => UnitStats {
                speed: 0.20,
                health: 80.0,
                shape: Box { width: 0.25, height: 0.5, depth: 0.25 },
            },
            UnitKind::HeavyTank => UnitStats {
                speed: 0.08,
                health: 500.0,
                shape: Box { width: 1.0, height: 0.6, depth: 1.5 },
            },
            UnitKind::AntiAir => UnitStats {
                speed: 0.10,
                health: 200.0,
                shape: Cylinder { height: 0.7, diameter: 0.6 },
            },
            UnitKind::Engineer => UnitStats {
                speed: 0.12,
                health: 90.0,
                shape: Box { width: 0.35, height: 0.7, depth: 0.35 },
            },
            UnitKind::Medic => UnitStats {
                speed: 0.14,
                health: 110.0,
                shape: Box { width: 0.35, height: 0.7, depth: 0.35 },
            },
            UnitKind::Sniper => UnitStats {
                speed: 0.13,
                health: 85.0,
                shape: Box { width: 0.25, height: 0.8, depth: 0.25 },
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            UnitKind::Infantry => "infantry",
            UnitKind::Tank => "tank",
            UnitKind::Artillery => "artillery",
            UnitKind::Cavalry => "cavalry",
            UnitKind::Scout => "scout",
            UnitKind::HeavyTank => "heavy_tank",
            UnitKind::AntiAir => "anti_air",
            UnitKind::Engineer => "engineer",
            UnitKind::Medic => "medic",
            UnitKind::Sniper => "sniper",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Blue,
    Red,
    Neutral,
}

/// Highlight applied to every selected unit regardless of team.
pub const SELECTED_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);

impl Team {
    pub const fn color(self) -> Color {
        match self {
            Team::Blue => Color::srgb(0.2, 0.4, 0.8),
            Team::Red => Color::srgb(0.8, 0.2, 0.2),
            Team::Neutral => Color::srgb(0.6, 0.6, 0.6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_table_matches_roster_tuning() {
        let heavy = UnitKind::HeavyTank.stats();
        assert_eq!(heavy.speed, 0.08);
        assert_eq!(heavy.health, 500.0);
        assert_eq!(UnitKind::Cavalry.stats().speed, 0.25);
        assert_eq!(UnitKind::Sniper.stats().health, 85.0);
    }

    #[test]
    fn every_kind_has_positive_stats() {
        for kind in UnitKind::ALL {
            let s = kind.stats();
            assert!(s.speed > 0.0 && s.health > 0.0, "{}", kind.name());
            assert!(s.shape.bounding_radius() > 0.0);
        }
    }
}
