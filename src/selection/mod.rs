// src/selection/mod.rs

pub mod geometry;
pub mod lasso;
mod plugin;
pub mod rectangle;
pub mod strategy;

pub use lasso::LassoSelection;
pub use plugin::SelectionPlugin;
pub use rectangle::RectangleSelection;
pub use strategy::{GestureOverlay, SelectionController, SelectionMode, SelectionStrategy};
