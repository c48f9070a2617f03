// src/input/dispatcher.rs
//! Turns the raw pointer stream into game commands: click, drag-select,
//! camera orbit, wheel and pinch zoom, long press.
//!
//! Time only enters through event timestamps and `advance(now)`, so every
//! classification is reproducible in tests.

use bevy::prelude::*;

use crate::config::InputConfig;
use crate::input::event::{PointerButton, PointerDevice, PointerEvent, PointerPhase};

/// Commands the dispatcher issues. Implemented by the game over a scene.
pub trait InputTarget {
    /// Does a raycast at `screen` land on a unit?
    fn hits_unit(&self, screen: Vec2) -> bool;
    /// Full left-click priority chain (select / move / object / start gesture).
    fn left_click(&mut self, screen: Vec2);
    /// Start an area-selection gesture without the click chain.
    fn begin_gesture(&mut self, screen: Vec2);
    fn drag_gesture(&mut self, screen: Vec2);
    fn end_gesture(&mut self);
    /// Discard the gesture and its overlay, selection untouched.
    fn cancel_gesture(&mut self);
    fn long_press(&mut self, screen: Vec2);
    /// Orbit by a pixel delta.
    fn orbit_camera(&mut self, pixel_delta: Vec2);
    /// Change the orbit radius by an absolute amount.
    fn zoom_camera(&mut self, radius_delta: f32);
    /// Scale the orbit radius by `1 / ratio`.
    fn pinch_camera(&mut self, ratio: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    /// Touch is down but not yet classified.
    Pending,
    Dragging,
    CameraPanning,
    TapResolved,
}

/// One pointer from down to up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    pub contact: u64,
    pub device: PointerDevice,
    pub origin: Vec2,
    pub last: Vec2,
    pub started_ms: u64,
    pub state: InteractionState,
}

/// Scheduled long press. Cancelling is dropping the token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerToken {
    pub deadline_ms: u64,
    pub contact: u64,
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchLock {
    #[default]
    Free,
    /// A touch is down.
    Held,
    CoolingDown { until_ms: u64 },
}

impl TouchLock {
    pub fn is_locked(self, now_ms: u64) -> bool {
        match self {
            TouchLock::Free => false,
            TouchLock::Held => true,
            TouchLock::CoolingDown { until_ms } => now_ms < until_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pinch {
    distance: f32,
    midpoint: Vec2,
}

impl Pinch {
    fn from_event(ev: &PointerEvent) -> Option<Self> {
        let (a, b) = (ev.contacts.first()?, ev.contacts.get(1)?);
        Some(Self {
            distance: a.position.distance(b.position),
            midpoint: (a.position + b.position) * 0.5,
        })
    }
}

#[derive(Clone, Debug)]
pub struct InputDispatcher {
    cfg: InputConfig,
    interaction: Option<Interaction>,
    long_press: Option<TimerToken>,
    touch_lock: TouchLock,
    pinch: Option<Pinch>,
    touch_capable: bool,
}

impl InputDispatcher {
    pub fn new(cfg: &InputConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            interaction: None,
            long_press: None,
            touch_lock: TouchLock::Free,
            pinch: None,
            touch_capable: false,
        }
    }

    // ---------- Introspection ----------

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    pub fn state(&self) -> Option<InteractionState> {
        self.interaction.map(|i| i.state)
    }

    pub fn pending_long_press(&self) -> Option<&TimerToken> {
        self.long_press.as_ref()
    }

    pub fn is_touch_capable(&self) -> bool {
        self.touch_capable
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    pub fn touch_lock(&self) -> TouchLock {
        self.touch_lock
    }

    pub fn long_press_delay_ms(&self) -> u64 {
        if self.touch_capable { self.cfg.touch_long_press_ms } else { self.cfg.long_press_ms }
    }

    // ---------- Driving ----------

    /// Forget every in-flight pointer: interaction, pending long press,
    /// pinch and touch lock. Ups that arrive while input is not flowing are
    /// never seen, so whatever was down is treated as lifted.
    pub fn reset(&mut self) {
        if self.interaction.is_some() || self.pinch.is_some() || self.touch_lock != TouchLock::Free {
            debug!("Input: dispatcher reset, dropping in-flight pointer state");
        }
        self.interaction = None;
        self.long_press = None;
        self.pinch = None;
        self.touch_lock = TouchLock::Free;
    }

    /// Fire the long press if its deadline has passed.
    pub fn advance(&mut self, now_ms: u64, target: &mut dyn InputTarget) {
        let Some(token) = self.long_press else { return };
        if now_ms < token.deadline_ms {
            return;
        }
        self.long_press = None;

        let tapped = self
            .interaction
            .is_some_and(|i| i.contact == token.contact && i.state == InteractionState::TapResolved);
        if tapped {
            return;
        }
        debug!("Input: long press at ({:.0},{:.0})", token.position.x, token.position.y);
        target.long_press(token.position);
    }

    pub fn handle(&mut self, ev: &PointerEvent, target: &mut dyn InputTarget) {
        // Timers that expired before this event fire first.
        self.advance(ev.timestamp_ms, target);

        if ev.contacts.iter().any(|c| c.device == PointerDevice::Touch) && !self.touch_capable {
            self.touch_capable = true;
            debug!("Input: touch device detected, long press now {}ms", self.cfg.touch_long_press_ms);
        }

        match ev.phase {
            PointerPhase::Down => self.on_down(ev, target),
            PointerPhase::Move => self.on_move(ev, target),
            PointerPhase::Up => self.on_up(ev, target),
            PointerPhase::Wheel => target.zoom_camera(ev.wheel_delta * self.cfg.wheel_zoom_speed),
        }
    }

    fn on_down(&mut self, ev: &PointerEvent, target: &mut dyn InputTarget) {
        if ev.contacts.len() >= 2 {
            self.begin_pinch(ev, target);
            return;
        }
        let Some(&contact) = ev.primary() else { return };
        let now = ev.timestamp_ms;

        let mut interaction = Interaction {
            contact: contact.id,
            device: contact.device,
            origin: contact.position,
            last: contact.position,
            started_ms: now,
            state: InteractionState::Pending,
        };

        match contact.device {
            PointerDevice::Touch => {
                if self.touch_lock.is_locked(now) {
                    debug!("Input: touch ignored, lock active");
                    return;
                }
                self.touch_lock = TouchLock::Held;
                self.schedule_long_press(contact.id, contact.position, now);
            }
            PointerDevice::Mouse | PointerDevice::Pen => {
                match ev.button.unwrap_or(PointerButton::Primary) {
                    PointerButton::Primary => {
                        target.left_click(contact.position);
                        interaction.state = InteractionState::Dragging;
                        self.schedule_long_press(contact.id, contact.position, now);
                    }
                    PointerButton::Middle => interaction.state = InteractionState::CameraPanning,
                    PointerButton::Secondary => return,
                }
            }
        }
        self.interaction = Some(interaction);
    }

    fn on_move(&mut self, ev: &PointerEvent, target: &mut dyn InputTarget) {
        if ev.contacts.len() >= 2 {
            match self.pinch {
                Some(prev) => {
                    let Some(next) = Pinch::from_event(ev) else { return };
                    if prev.distance > f32::EPSILON && next.distance > f32::EPSILON {
                        target.pinch_camera(next.distance / prev.distance);
                    }
                    self.pinch = Some(next);
                }
                None => self.begin_pinch(ev, target),
            }
            return;
        }

        let Some(&contact) = ev.primary() else { return };
        let Some(mut it) = self.interaction.filter(|i| i.contact == contact.id) else { return };
        let pos = contact.position;

        if it.origin.distance(pos) > self.cfg.touch_slop_px {
            self.long_press = None;
        }

        if it.state == InteractionState::Pending && it.origin.distance(pos) > self.cfg.touch_slop_px {
            if target.hits_unit(it.origin) {
                debug!("Input: touch drag from unit, starting selection gesture");
                target.begin_gesture(it.origin);
                it.state = InteractionState::Dragging;
            } else {
                debug!("Input: touch drag on empty ground, panning camera");
                it.state = InteractionState::CameraPanning;
            }
        }

        match it.state {
            InteractionState::Dragging => target.drag_gesture(pos),
            InteractionState::CameraPanning => target.orbit_camera(pos - it.last),
            InteractionState::Pending | InteractionState::TapResolved => {}
        }
        it.last = pos;
        self.interaction = Some(it);
    }

    fn on_up(&mut self, ev: &PointerEvent, target: &mut dyn InputTarget) {
        let now = ev.timestamp_ms;
        if self.pinch.take().is_some() {
            self.interaction = None;
            self.long_press = None;
            self.touch_lock = TouchLock::CoolingDown { until_ms: now + self.cfg.touch_lock_ms };
            return;
        }

        let Some(&contact) = ev.primary() else { return };
        let Some(mut it) = self.interaction.filter(|i| i.contact == contact.id) else { return };
        self.long_press = None;
        let pos = contact.position;

        if it.device == PointerDevice::Touch {
            let distance = it.origin.distance(pos);
            let elapsed = now.saturating_sub(it.started_ms);
            if it.state == InteractionState::Pending
                && distance < self.cfg.tap_max_distance_px
                && elapsed < self.cfg.tap_max_duration_ms
            {
                debug!("Input: tap ({distance:.1}px, {elapsed}ms)");
                it.state = InteractionState::TapResolved;
                self.interaction = Some(it);
                target.left_click(pos);
            }
            self.touch_lock = TouchLock::CoolingDown { until_ms: now + self.cfg.touch_lock_ms };
        }

        target.end_gesture();
        self.interaction = None;
    }

    /// A second finger turns whatever the first one was doing into a pinch.
    fn begin_pinch(&mut self, ev: &PointerEvent, target: &mut dyn InputTarget) {
        if self.interaction.take().is_some_and(|i| i.state == InteractionState::Dragging) {
            target.cancel_gesture();
        }
        self.long_press = None;
        self.pinch = Pinch::from_event(ev);
        if let Some(p) = self.pinch {
            debug!("Input: pinch start, span {:.0}px at ({:.0},{:.0})", p.distance, p.midpoint.x, p.midpoint.y);
        }
    }

    fn schedule_long_press(&mut self, contact: u64, position: Vec2, now_ms: u64) {
        self.long_press = Some(TimerToken {
            deadline_ms: now_ms + self.long_press_delay_ms(),
            contact,
            position,
        });
    }
}
