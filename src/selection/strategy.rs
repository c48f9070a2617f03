// src/selection/strategy.rs
//! Common contract for area-selection gestures and the controller that keeps
//! exactly one of them enabled.

use bevy::prelude::*;

use crate::scene::SceneQuery;
use crate::selection::lasso::LassoSelection;
use crate::selection::rectangle::RectangleSelection;
use crate::unit::{UnitId, UnitRegistry};

/// What the render side should draw for an in-progress gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOverlay {
    Rect(Rect),
    /// Open polyline in screen pixels, in input order.
    Lasso(Vec<Vec2>),
}

pub trait SelectionStrategy {
    fn start(&mut self, point: Vec2);

    /// Ignored unless a gesture is active.
    fn update(&mut self, point: Vec2);

    /// Finish the gesture and apply it to `units`. Always clears the gesture.
    /// Returns how many units matched.
    fn end(&mut self, units: &mut UnitRegistry, scene: &dyn SceneQuery) -> usize;

    /// Drop the gesture without touching the selection.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;

    fn overlay(&self) -> Option<GestureOverlay>;
}

/// Project every unit and keep the ones `inside` accepts. Units that fail to
/// project are skipped.
pub(crate) fn collect_matches(
    units: &UnitRegistry,
    scene: &dyn SceneQuery,
    mut inside: impl FnMut(Vec2) -> bool,
) -> Vec<UnitId> {
    units
        .iter()
        .filter_map(|u| scene.world_to_screen(u.position).map(|p| (u.id, p)))
        .filter(|&(_, p)| inside(p))
        .map(|(id, _)| id)
        .collect()
}

/// An empty match set is a clear-selection gesture.
pub(crate) fn apply_matches(units: &mut UnitRegistry, matches: Vec<UnitId>) -> usize {
    let count = matches.len();
    if matches.is_empty() {
        units.deselect_all();
    } else {
        units.select_many(matches);
    }
    count
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    Rectangle,
    #[default]
    Lasso,
}

impl SelectionMode {
    pub fn toggled(self) -> Self {
        match self {
            SelectionMode::Rectangle => SelectionMode::Lasso,
            SelectionMode::Lasso => SelectionMode::Rectangle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::Rectangle => "rectangle",
            SelectionMode::Lasso => "lasso",
        }
    }
}

/// Owns both strategies; only the one matching `mode` receives gestures.
#[derive(Debug, Default)]
pub struct SelectionController {
    mode: SelectionMode,
    rectangle: RectangleSelection,
    lasso: LassoSelection,
}

impl SelectionController {
    pub fn new(mode: SelectionMode) -> Self {
        Self { mode, ..default() }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Cancels any gesture in flight (hiding its overlay) before switching.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.rectangle.cancel();
        self.lasso.cancel();
        if self.mode != mode {
            info!("Selection mode: {}", mode.label());
        }
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> SelectionMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    pub fn active(&self) -> &dyn SelectionStrategy {
        match self.mode {
            SelectionMode::Rectangle => &self.rectangle,
            SelectionMode::Lasso => &self.lasso,
        }
    }

    pub fn active_mut(&mut self) -> &mut dyn SelectionStrategy {
        match self.mode {
            SelectionMode::Rectangle => &mut self.rectangle,
            SelectionMode::Lasso => &mut self.lasso,
        }
    }

    pub fn overlay(&self) -> Option<GestureOverlay> {
        self.active().overlay()
    }
}
