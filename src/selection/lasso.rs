// src/selection/lasso.rs
use bevy::prelude::*;

use crate::scene::SceneQuery;
use crate::selection::geometry::point_in_polygon;
use crate::selection::strategy::{apply_matches, collect_matches, GestureOverlay, SelectionStrategy};
use crate::unit::UnitRegistry;

/// Below this many recorded points a lasso selects nothing.
pub const MIN_LASSO_POINTS: usize = 3;

/// Freehand selection. Every update appends a vertex.
#[derive(Clone, Debug, Default)]
pub struct LassoSelection {
    active: bool,
    points: Vec<Vec2>,
}

impl LassoSelection {
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

impl SelectionStrategy for LassoSelection {
    fn start(&mut self, point: Vec2) {
        self.active = true;
        self.points.clear();
        self.points.push(point);
    }

    fn update(&mut self, point: Vec2) {
        if self.active {
            self.points.push(point);
        }
    }

    fn end(&mut self, units: &mut UnitRegistry, scene: &dyn SceneQuery) -> usize {
        if !self.active {
            return 0;
        }
        self.active = false;
        let mut ring = std::mem::take(&mut self.points);

        if ring.len() < MIN_LASSO_POINTS {
            debug!("Lasso with {} points ignored", ring.len());
            return 0;
        }
        ring.push(ring[0]);

        let matches = collect_matches(units, scene, |p| point_in_polygon(p, &ring));
        debug!("Lasso ({} points) matched {}", ring.len() - 1, matches.len());
        apply_matches(units, matches)
    }

    fn cancel(&mut self) {
        self.active = false;
        self.points.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn overlay(&self) -> Option<GestureOverlay> {
        (self.active && self.points.len() >= 2).then(|| GestureOverlay::Lasso(self.points.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitConfig;
    use crate::scene::testing::FlatProjection;
    use crate::unit::{Team, UnitKind};

    fn registry() -> UnitRegistry {
        UnitRegistry::new(&UnitConfig::default(), 3)
    }

    #[test]
    fn two_point_lasso_keeps_selection() {
        let mut units = registry();
        let a = units.spawn(UnitKind::Medic, Vec3::new(1.0, 0.0, 1.0), Team::Red);
        units.select(a);

        let mut lasso = LassoSelection::default();
        lasso.start(Vec2::ZERO);
        lasso.update(Vec2::new(50.0, 0.0));
        assert_eq!(lasso.end(&mut units, &FlatProjection), 0);
        assert!(units.is_selected(a));
        assert!(lasso.points().is_empty());
    }

    #[test]
    fn enclosed_units_are_selected() {
        let mut units = registry();
        let inside = units.spawn(UnitKind::Medic, Vec3::new(10.0, 0.0, 10.0), Team::Red);
        units.spawn(UnitKind::Medic, Vec3::new(90.0, 0.0, 90.0), Team::Red);

        let mut lasso = LassoSelection::default();
        lasso.start(Vec2::ZERO);
        lasso.update(Vec2::new(100.0, 0.0));
        assert!(matches!(lasso.overlay(), Some(GestureOverlay::Lasso(ref p)) if p.len() == 2));
        lasso.update(Vec2::new(0.0, 100.0));
        assert_eq!(lasso.end(&mut units, &FlatProjection), 1);
        assert_eq!(units.selected().collect::<Vec<_>>(), vec![inside]);
    }

    #[test]
    fn lasso_around_nothing_clears_an_existing_selection() {
        let mut units = registry();
        let a = units.spawn(UnitKind::Tank, Vec3::new(10.0, 0.0, 10.0), Team::Blue);
        let b = units.spawn(UnitKind::Scout, Vec3::new(20.0, 0.0, 10.0), Team::Blue);
        units.select_many([a, b]);

        let mut lasso = LassoSelection::default();
        lasso.start(Vec2::new(300.0, 300.0));
        lasso.update(Vec2::new(400.0, 300.0));
        lasso.update(Vec2::new(350.0, 400.0));
        assert_eq!(lasso.end(&mut units, &FlatProjection), 0);
        assert!(!units.has_selection());
        assert!(!units.is_selected(a) && !units.is_selected(b));
    }

    #[test]
    fn cancel_drops_points() {
        let mut lasso = LassoSelection::default();
        lasso.start(Vec2::ZERO);
        lasso.update(Vec2::ONE);
        lasso.cancel();
        assert!(!lasso.is_active());
        assert!(lasso.overlay().is_none());
        lasso.update(Vec2::splat(2.0));
        assert!(lasso.points().is_empty());
    }
}
