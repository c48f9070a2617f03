use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    ZoomIn,
    ZoomOut,
    ResetCamera,
    ClearSelection,
    ToggleSelectionMode,
    TogglePause,
}

/// Key bindings. ESDF and WASD share keys, so one key may drive two actions.
pub const BINDINGS: &[(PlayerAction, &[KeyCode])] = &[
    (PlayerAction::MoveForward, &[KeyCode::KeyE, KeyCode::KeyW, KeyCode::ArrowUp]),
    (PlayerAction::MoveBackward, &[KeyCode::KeyD, KeyCode::KeyS, KeyCode::ArrowDown]),
    (PlayerAction::MoveLeft, &[KeyCode::KeyS, KeyCode::KeyA, KeyCode::ArrowLeft]),
    (PlayerAction::MoveRight, &[KeyCode::KeyF, KeyCode::KeyD, KeyCode::ArrowRight]),
    (PlayerAction::ZoomIn, &[KeyCode::KeyQ]),
    (PlayerAction::ZoomOut, &[KeyCode::KeyR]),
    (PlayerAction::ResetCamera, &[KeyCode::Space]),
    (PlayerAction::ClearSelection, &[KeyCode::Escape]),
    (PlayerAction::ToggleSelectionMode, &[KeyCode::Tab]),
    (PlayerAction::TogglePause, &[KeyCode::KeyP]),
];

#[derive(Default, Resource)]
pub struct ActionState {
    pressed: HashMap<PlayerAction, bool>,
    just_pressed: HashSet<PlayerAction>,
}

impl ActionState {
    pub fn set(&mut self, action: PlayerAction, is_pressed: bool) {
        let was = self.pressed(action);
        if is_pressed && !was {
            self.just_pressed.insert(action);
        }
        self.pressed.insert(action, is_pressed);
    }

    pub fn pressed(&self, action: PlayerAction) -> bool {
        *self.pressed.get(&action).unwrap_or(&false)
    }

    /// True only on the frame the action went down.
    pub fn just_pressed(&self, action: PlayerAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Called once per frame before the new key state is written.
    pub fn clear_just_pressed(&mut self) {
        self.just_pressed.clear();
    }

    /// Refresh every binding from the keyboard.
    pub fn update_from(&mut self, keys: &ButtonInput<KeyCode>) {
        self.clear_just_pressed();
        for &(action, codes) in BINDINGS {
            self.set(action, keys.any_pressed(codes.iter().copied()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_key_drives_both_actions() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyS);
        let mut state = ActionState::default();
        state.update_from(&keys);
        assert!(state.pressed(PlayerAction::MoveBackward));
        assert!(state.pressed(PlayerAction::MoveLeft));
        assert!(!state.pressed(PlayerAction::MoveForward));
    }

    #[test]
    fn just_pressed_lasts_one_update() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::Tab);
        let mut state = ActionState::default();
        state.update_from(&keys);
        assert!(state.just_pressed(PlayerAction::ToggleSelectionMode));
        state.update_from(&keys);
        assert!(state.pressed(PlayerAction::ToggleSelectionMode));
        assert!(!state.just_pressed(PlayerAction::ToggleSelectionMode));
    }
}
