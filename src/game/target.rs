// src/game/target.rs
//! Game-side meaning of dispatcher commands.

use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::game::props::SceneProp;
use crate::input::InputTarget;
use crate::scene::{PickHit, PropId, SceneObjectId, SceneQuery};
use crate::selection::SelectionController;
use crate::terrain::TerrainService;
use crate::unit::UnitRegistry;

/// Everything the player can touch, split from the dispatcher so both can be
/// borrowed at once.
#[derive(Debug)]
pub struct Battlefield {
    pub(crate) terrain: TerrainService,
    pub(crate) units: UnitRegistry,
    pub(crate) selection: SelectionController,
    pub(crate) camera: OrbitCamera,
    pub(crate) props: Vec<SceneProp>,
    pub(crate) selected_prop: Option<PropId>,
    pub(crate) min_move_height: f32,
    pub(crate) ground_offset: f32,
}

impl Battlefield {
    /// Left-click priority chain: unit, move order, scenery, new gesture.
    pub fn left_click(&mut self, screen: Vec2, scene: &dyn SceneQuery) {
        let hit = scene.pick(screen);

        if let Some(PickHit { object: SceneObjectId::Unit(id), .. }) = hit {
            if self.units.contains(id) {
                if self.units.is_selected(id) {
                    debug!("Click: deselect unit {}", id.0);
                    self.units.deselect(id);
                } else {
                    debug!("Click: select unit {}", id.0);
                    self.units.select(id);
                }
                return;
            }
        }

        if self.units.has_selection() {
            if let Some(PickHit { point, .. }) = hit {
                let y = (point.y + self.ground_offset).max(self.min_move_height);
                let target = Vec3::new(point.x, y, point.z);
                debug!(
                    "Click: move {} unit(s) to ({:.1},{:.1},{:.1})",
                    self.units.selected_count(),
                    target.x,
                    target.y,
                    target.z
                );
                self.units.move_selection(target);
                return;
            }
        }

        if let Some(PickHit { object: SceneObjectId::Prop(id), .. }) = hit {
            if self.select_object(id) {
                return;
            }
        }

        self.clear_selection();
        self.selection.active_mut().start(screen);
    }

    /// Mark one scenery object as selected, reverting the previous one.
    /// Returns false for unknown ids.
    pub fn select_object(&mut self, id: PropId) -> bool {
        if !self.props.iter().any(|p| p.id == id) {
            return false;
        }
        self.deselect_object();
        if let Some(prop) = self.props.iter_mut().find(|p| p.id == id) {
            prop.is_selected = true;
            debug!("Object selected: {}", prop.name);
        }
        self.selected_prop = Some(id);
        true
    }

    pub fn deselect_object(&mut self) {
        let Some(id) = self.selected_prop.take() else { return };
        if let Some(prop) = self.props.iter_mut().find(|p| p.id == id) {
            prop.is_selected = false;
        }
    }

    pub fn clear_selection(&mut self) {
        self.units.deselect_all();
        self.deselect_object();
    }

    fn hits_known_unit(&self, screen: Vec2, scene: &dyn SceneQuery) -> bool {
        matches!(
            scene.pick(screen),
            Some(PickHit { object: SceneObjectId::Unit(id), .. }) if self.units.contains(id)
        )
    }
}

/// Binds the battlefield to the current frame's scene for one dispatch.
pub(crate) struct SceneTarget<'a> {
    pub field: &'a mut Battlefield,
    pub scene: &'a dyn SceneQuery,
    pub pan_speed: f32,
}

impl InputTarget for SceneTarget<'_> {
    fn hits_unit(&self, screen: Vec2) -> bool {
        self.field.hits_known_unit(screen, self.scene)
    }

    fn left_click(&mut self, screen: Vec2) {
        self.field.left_click(screen, self.scene);
    }

    fn begin_gesture(&mut self, screen: Vec2) {
        self.field.selection.active_mut().start(screen);
    }

    fn drag_gesture(&mut self, screen: Vec2) {
        self.field.selection.active_mut().update(screen);
    }

    fn end_gesture(&mut self) {
        let field = &mut *self.field;
        let strategy = field.selection.active_mut();
        if !strategy.is_active() {
            return;
        }
        let matched = strategy.end(&mut field.units, self.scene);
        debug!("Gesture ended: {matched} unit(s) matched");
    }

    fn cancel_gesture(&mut self) {
        self.field.selection.active_mut().cancel();
    }

    fn long_press(&mut self, _screen: Vec2) {
        self.field.units.deselect_all();
    }

    fn orbit_camera(&mut self, pixel_delta: Vec2) {
        self.field.camera.pan(pixel_delta, self.pan_speed);
    }

    fn zoom_camera(&mut self, radius_delta: f32) {
        self.field.camera.zoom_by(radius_delta);
    }

    fn pinch_camera(&mut self, ratio: f32) {
        self.field.camera.pinch(ratio);
    }
}
