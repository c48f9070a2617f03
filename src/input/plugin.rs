// src/input/plugin.rs
//! Bevy side of input: native mouse, wheel and touch events become
//! `PointerEvent`s in the `InputQueue`; keys become `PlayerAction`s.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::TouchPhase;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowEvent};

use crate::actions::ActionState;
use crate::game::GameSet;
use crate::input::event::{Contact, InputQueue, PointerButton, PointerEvent, PointerPhase};
use crate::state::GameState;

/// Pixels per wheel "line", so both scroll units feed the same zoom speed.
const WHEEL_LINE_PIXELS: f32 = 100.0;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputQueue>()
            .init_resource::<ActionState>()
            .add_systems(
                Update,
                (input_mapping_system, collect_pointer_events).before(GameSet::Input),
            );
    }
}

pub fn input_mapping_system(keys: Res<ButtonInput<KeyCode>>, mut action_state: ResMut<ActionState>) {
    action_state.update_from(&keys);
}

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Browser convention: positive delta scrolls down, which zooms out.
pub fn wheel_delta(ev: &MouseWheel) -> f32 {
    match ev.unit {
        MouseScrollUnit::Line => -ev.y * WHEEL_LINE_PIXELS,
        MouseScrollUnit::Pixel => -ev.y,
    }
}

/// Cursor and finger positions as of the last window event walked.
/// Presses and releases take the position current at their own event,
/// not the position at the end of the frame.
#[derive(Default, Debug)]
pub struct PointerTracker {
    cursor: Option<Vec2>,
    touches: Vec<(u64, Vec2)>,
}

impl PointerTracker {
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Fingers currently down, in the order they landed.
    pub fn touches(&self) -> &[(u64, Vec2)] {
        &self.touches
    }

    fn others(&self, id: u64) -> Vec<Contact> {
        self.touches
            .iter()
            .filter(|(other, _)| *other != id)
            .map(|&(other, position)| Contact::touch(other, position))
            .collect()
    }

    /// Update positions from one window event and translate it, if it is a
    /// pointer event at all.
    pub fn translate(&mut self, ev: &WindowEvent, now_ms: u64) -> Option<PointerEvent> {
        match ev {
            WindowEvent::CursorMoved(moved) => {
                self.cursor = Some(moved.position);
                Some(PointerEvent::mouse_move(moved.position, now_ms))
            }
            WindowEvent::MouseButtonInput(input) => {
                let button = map_button(input.button)?;
                let position = self.cursor?;
                Some(match input.state {
                    ButtonState::Pressed => PointerEvent::mouse_down(position, button, now_ms),
                    ButtonState::Released => PointerEvent::mouse_up(position, button, now_ms),
                })
            }
            WindowEvent::MouseWheel(wheel) => Some(PointerEvent::wheel(
                self.cursor.unwrap_or_default(),
                wheel_delta(wheel),
                now_ms,
            )),
            WindowEvent::TouchInput(touch) => {
                let others = self.others(touch.id);
                let phase = match touch.phase {
                    TouchPhase::Started => {
                        self.touches.push((touch.id, touch.position));
                        PointerPhase::Down
                    }
                    TouchPhase::Moved => {
                        if let Some(entry) = self.touches.iter_mut().find(|(id, _)| *id == touch.id) {
                            entry.1 = touch.position;
                        }
                        PointerPhase::Move
                    }
                    TouchPhase::Ended | TouchPhase::Canceled => {
                        self.touches.retain(|(id, _)| *id != touch.id);
                        PointerPhase::Up
                    }
                };
                Some(PointerEvent::touch(phase, touch.id, touch.position, now_ms).with_others(others))
            }
            _ => None,
        }
    }
}

/// Walk this frame's window events in arrival order. The tracker follows
/// every event, paused or not, so positions and fingers stay current; the
/// queue only fills while the game is running.
pub fn collect_pointer_events(
    mut window_evr: EventReader<WindowEvent>,
    mut tracker: Local<PointerTracker>,
    windows: Query<&Window, With<PrimaryWindow>>,
    state: Res<State<GameState>>,
    time: Res<Time<Real>>,
    mut queue: ResMut<InputQueue>,
) {
    if tracker.cursor.is_none() {
        tracker.cursor = windows.single().ok().and_then(|w| w.cursor_position());
    }
    let now = time.elapsed().as_millis() as u64;
    let running = *state.get() == GameState::Running;

    for ev in window_evr.read() {
        let Some(event) = tracker.translate(ev, now) else { continue };
        if running {
            queue.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::entity::Entity;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::input::mouse::MouseButtonInput;
    use bevy::input::touch::TouchInput;
    use bevy::window::CursorMoved;

    fn cursor_moved(x: f32, y: f32) -> WindowEvent {
        WindowEvent::CursorMoved(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(x, y),
            delta: None,
        })
    }

    fn left(state: ButtonState) -> WindowEvent {
        WindowEvent::MouseButtonInput(MouseButtonInput {
            button: MouseButton::Left,
            state,
            window: Entity::PLACEHOLDER,
        })
    }

    fn finger(phase: TouchPhase, id: u64, x: f32, y: f32) -> WindowEvent {
        WindowEvent::TouchInput(TouchInput {
            phase,
            position: Vec2::new(x, y),
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        })
    }

    fn input_world(state: GameState) -> World {
        let mut world = World::new();
        world.init_resource::<Events<WindowEvent>>();
        world.init_resource::<InputQueue>();
        world.insert_resource(Time::<Real>::default());
        world.insert_resource(State::new(state));
        world
    }

    fn queued(world: &mut World) -> Vec<(PointerPhase, Vec2)> {
        world
            .resource_mut::<InputQueue>()
            .drain()
            .map(|e| (e.phase, e.contacts[0].position))
            .collect()
    }

    #[test]
    fn press_and_drag_in_one_frame_keep_arrival_order() {
        let mut world = input_world(GameState::Running);
        for ev in [
            cursor_moved(10.0, 10.0),
            left(ButtonState::Pressed),
            cursor_moved(100.0, 100.0),
            left(ButtonState::Released),
        ] {
            world.send_event(ev);
        }
        world.run_system_once(collect_pointer_events).unwrap();

        assert_eq!(
            queued(&mut world),
            vec![
                (PointerPhase::Move, Vec2::new(10.0, 10.0)),
                (PointerPhase::Down, Vec2::new(10.0, 10.0)),
                (PointerPhase::Move, Vec2::new(100.0, 100.0)),
                (PointerPhase::Up, Vec2::new(100.0, 100.0)),
            ]
        );
    }

    #[test]
    fn nothing_is_queued_while_paused() {
        let mut world = input_world(GameState::Paused);
        world.send_event(cursor_moved(5.0, 5.0));
        world.send_event(finger(TouchPhase::Started, 1, 5.0, 5.0));
        world.run_system_once(collect_pointer_events).unwrap();
        assert!(queued(&mut world).is_empty());
    }

    #[test]
    fn press_before_any_cursor_position_is_dropped() {
        let mut tracker = PointerTracker::default();
        assert!(tracker.translate(&left(ButtonState::Pressed), 0).is_none());
        tracker.translate(&cursor_moved(3.0, 4.0), 0);
        let down = tracker.translate(&left(ButtonState::Pressed), 0).unwrap();
        assert_eq!(down.phase, PointerPhase::Down);
        assert_eq!(down.contacts[0].position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn second_finger_carries_the_first_as_another_contact() {
        let mut tracker = PointerTracker::default();
        tracker.translate(&finger(TouchPhase::Started, 1, 0.0, 0.0), 0);
        tracker.translate(&finger(TouchPhase::Moved, 1, 10.0, 0.0), 5);
        let second = tracker.translate(&finger(TouchPhase::Started, 2, 100.0, 0.0), 10).unwrap();
        assert_eq!(second.contacts, vec![Contact::touch(2, Vec2::new(100.0, 0.0)), Contact::touch(1, Vec2::new(10.0, 0.0))]);

        let lifted = tracker.translate(&finger(TouchPhase::Ended, 2, 100.0, 0.0), 20).unwrap();
        assert_eq!(lifted.phase, PointerPhase::Up);
        assert_eq!(lifted.contacts.len(), 2);
        assert_eq!(tracker.touches(), &[(1, Vec2::new(10.0, 0.0))]);
    }

    #[test]
    fn scrolling_up_zooms_in_for_both_units() {
        let line = MouseWheel { unit: MouseScrollUnit::Line, x: 0.0, y: 1.0, window: Entity::PLACEHOLDER };
        let pixel = MouseWheel { unit: MouseScrollUnit::Pixel, x: 0.0, y: 30.0, window: Entity::PLACEHOLDER };
        assert_eq!(wheel_delta(&line), -100.0);
        assert_eq!(wheel_delta(&pixel), -30.0);
    }

    #[test]
    fn only_three_buttons_are_mapped() {
        assert_eq!(map_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(map_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(map_button(MouseButton::Back), None);
    }
}
