//! RTS skirmish core: streamed tiled terrain, a unit registry with
//! click-to-move, rectangle and lasso selection, and a pointer/touch
//! dispatcher, with thin Bevy plugins for rendering and raw input.

pub mod actions;
pub mod camera;
pub mod config;
pub mod game;
pub mod input;
pub mod scene;
pub mod selection;
pub mod setup;
pub mod state;
pub mod terrain;
pub mod ui;
pub mod unit;
