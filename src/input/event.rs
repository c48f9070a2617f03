// src/input/event.rs
//! Device-neutral pointer vocabulary plus the per-frame event queue.

use std::collections::VecDeque;

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerDevice {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Wheel,
}

/// One finger / cursor, in window pixels (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub id: u64,
    pub position: Vec2,
    pub device: PointerDevice,
}

impl Contact {
    pub const MOUSE_ID: u64 = u64::MAX;

    pub fn mouse(position: Vec2) -> Self {
        Self { id: Self::MOUSE_ID, position, device: PointerDevice::Mouse }
    }

    pub fn touch(id: u64, position: Vec2) -> Self {
        Self { id, position, device: PointerDevice::Touch }
    }
}

/// `contacts[0]` is the contact this event is about; any further entries are
/// the other contacts currently down (so `contacts.len()` is the live count,
/// the lifted contact included for `Up`).
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub contacts: Vec<Contact>,
    pub button: Option<PointerButton>,
    pub wheel_delta: f32,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, contacts: Vec<Contact>, timestamp_ms: u64) -> Self {
        Self { phase, contacts, button: None, wheel_delta: 0.0, timestamp_ms }
    }

    pub fn mouse_down(position: Vec2, button: PointerButton, timestamp_ms: u64) -> Self {
        Self {
            button: Some(button),
            ..Self::new(PointerPhase::Down, vec![Contact::mouse(position)], timestamp_ms)
        }
    }

    pub fn mouse_move(position: Vec2, timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::Move, vec![Contact::mouse(position)], timestamp_ms)
    }

    pub fn mouse_up(position: Vec2, button: PointerButton, timestamp_ms: u64) -> Self {
        Self {
            button: Some(button),
            ..Self::new(PointerPhase::Up, vec![Contact::mouse(position)], timestamp_ms)
        }
    }

    /// Positive `delta` zooms out.
    pub fn wheel(position: Vec2, delta: f32, timestamp_ms: u64) -> Self {
        Self {
            wheel_delta: delta,
            ..Self::new(PointerPhase::Wheel, vec![Contact::mouse(position)], timestamp_ms)
        }
    }

    pub fn touch(phase: PointerPhase, id: u64, position: Vec2, timestamp_ms: u64) -> Self {
        Self::new(phase, vec![Contact::touch(id, position)], timestamp_ms)
    }

    /// Attach the other contacts that are down at the same time.
    pub fn with_others(mut self, others: impl IntoIterator<Item = Contact>) -> Self {
        self.contacts.extend(others);
        self
    }

    pub fn primary(&self) -> Option<&Contact> {
        self.contacts.first()
    }
}

/// Raw events in arrival order, drained once per frame before the game tick.
#[derive(Resource, Default, Debug)]
pub struct InputQueue {
    events: VecDeque<PointerEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: PointerEvent) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PointerEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
