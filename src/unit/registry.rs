// src/unit/registry.rs
//! Unit arena + selection set. The registry is the only thing that mutates
//! unit position, health or selection.

use std::collections::{BTreeMap, BTreeSet};

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::UnitConfig;
use crate::unit::kind::{Team, UnitKind, SELECTED_COLOR};

/// Speeds are tuned per 60 Hz tick.
const TICKS_PER_SECOND: f32 = 60.0;
/// Below this the facing is left alone.
const FACING_MIN_DIR: f32 = 0.01;

/// Sequential unit id, never reused within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub team: Team,
    pub position: Vec3,
    pub target: Vec3,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub is_moving: bool,
    pub is_selected: bool,
    /// Yaw in radians, `atan2(dir.x, dir.z)` of the last movement step.
    pub facing_yaw: f32,
}

impl Unit {
    fn new(id: UnitId, kind: UnitKind, position: Vec3, team: Team) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            team,
            position,
            target: position,
            speed: stats.speed,
            health: stats.health,
            max_health: stats.health,
            is_moving: false,
            is_selected: false,
            facing_yaw: 0.0,
        }
    }

    /// Material colour the renderer should show right now.
    pub fn display_color(&self) -> Color {
        if self.is_selected { SELECTED_COLOR } else { self.team.color() }
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 { self.health / self.max_health } else { 0.0 }
    }

    fn move_to(&mut self, target: Vec3) {
        self.target = target;
        self.is_moving = true;
    }

    /// One movement step. Arrival is detected on the step after a snap.
    fn advance(&mut self, dt: f32, arrive_epsilon: f32) {
        if !self.is_moving {
            return;
        }
        let to_target = self.target - self.position;
        let distance = to_target.length();
        if distance < arrive_epsilon {
            self.position = self.target;
            self.is_moving = false;
            return;
        }

        let dir = to_target / distance;
        let step = self.speed * dt * TICKS_PER_SECOND;
        if step > distance {
            self.position = self.target;
        } else {
            self.position += dir * step;
        }

        if dir.length() > FACING_MIN_DIR {
            self.facing_yaw = dir.x.atan2(dir.z);
        }
    }

    /// Returns true when health reached zero.
    fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.health <= 0.0
    }

    fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }
}

/// Read-only snapshot for HUDs and debugging.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitInfo {
    pub id: UnitId,
    pub kind: UnitKind,
    pub team: Team,
    pub health: f32,
    pub max_health: f32,
    pub position: Vec3,
    pub is_selected: bool,
    pub is_moving: bool,
}

impl From<&Unit> for UnitInfo {
    fn from(u: &Unit) -> Self {
        Self {
            id: u.id,
            kind: u.kind,
            team: u.team,
            health: u.health,
            max_health: u.max_health,
            position: u.position,
            is_selected: u.is_selected,
            is_moving: u.is_moving,
        }
    }
}

#[derive(Debug)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
    selected: BTreeSet<UnitId>,
    next_id: u32,
    rng: ChaCha8Rng,
    move_spread: f32,
    arrive_epsilon: f32,
}

impl UnitRegistry {
    pub fn new(cfg: &UnitConfig, seed: u64) -> Self {
        Self {
            units: BTreeMap::new(),
            selected: BTreeSet::new(),
            next_id: 1,
            // Keep jitter independent from other seeded streams.
            rng: ChaCha8Rng::seed_from_u64(seed ^ 0x5EED_0F_4A11),
            move_spread: cfg.move_spread,
            arrive_epsilon: cfg.arrive_epsilon,
        }
    }

    // ---------- Lifecycle ----------

    pub fn spawn(&mut self, kind: UnitKind, position: Vec3, team: Team) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.insert(id, Unit::new(id, kind, position, team));
        id
    }

    /// Pairs kinds with positions; extra entries on either side are ignored.
    pub fn spawn_group(&mut self, kinds: &[UnitKind], positions: &[Vec3], team: Team) -> Vec<UnitId> {
        kinds
            .iter()
            .zip(positions)
            .map(|(&kind, &pos)| self.spawn(kind, pos, team))
            .collect()
    }

    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.selected.remove(&id);
        self.units.remove(&id)
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.selected.clear();
    }

    // ---------- Selection ----------

    pub fn select(&mut self, id: UnitId) {
        self.deselect_all();
        if let Some(unit) = self.units.get_mut(&id) {
            unit.is_selected = true;
            self.selected.insert(id);
        }
    }

    pub fn select_many<I: IntoIterator<Item = UnitId>>(&mut self, ids: I) {
        self.deselect_all();
        for id in ids {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.is_selected = true;
                self.selected.insert(id);
            }
        }
    }

    pub fn deselect(&mut self, id: UnitId) {
        if self.selected.remove(&id) {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.is_selected = false;
            }
        }
    }

    pub fn deselect_all(&mut self) {
        for id in std::mem::take(&mut self.selected) {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.is_selected = false;
            }
        }
    }

    pub fn is_selected(&self, id: UnitId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in ascending order.
    pub fn selected(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.selected.iter().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    // ---------- Commands ----------

    /// Send every selected unit toward `target`, each to its own jittered
    /// point in a `move_spread`-wide square on the XZ plane.
    pub fn move_selection(&mut self, target: Vec3) {
        let spread = self.move_spread;
        for id in &self.selected {
            let Some(unit) = self.units.get_mut(id) else { continue };
            let ox = (self.rng.random::<f32>() - 0.5) * spread;
            let oz = (self.rng.random::<f32>() - 0.5) * spread;
            unit.move_to(target + Vec3::new(ox, 0.0, oz));
        }
    }

    /// Direct move without jitter or selection.
    pub fn move_unit(&mut self, id: UnitId, target: Vec3) {
        if let Some(unit) = self.units.get_mut(&id) {
            unit.move_to(target);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        let eps = self.arrive_epsilon;
        for unit in self.units.values_mut() {
            unit.advance(dt, eps);
        }
    }

    /// `Some(true)` when the unit is now at zero health. Removal is up to the caller.
    pub fn take_damage(&mut self, id: UnitId, amount: f32) -> Option<bool> {
        self.units.get_mut(&id).map(|u| u.take_damage(amount))
    }

    pub fn heal(&mut self, id: UnitId, amount: f32) {
        if let Some(unit) = self.units.get_mut(&id) {
            unit.heal(amount);
        }
    }

    // ---------- Queries ----------

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// All units in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units within `radius` of `position`, nearest first.
    pub fn units_near(&self, position: Vec3, radius: f32) -> Vec<(UnitId, f32)> {
        let mut hits: Vec<(UnitId, f32)> = self
            .units
            .values()
            .map(|u| (u.id, u.position.distance(position)))
            .filter(|&(_, d)| d <= radius)
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }

    pub fn selected_info(&self) -> Vec<UnitInfo> {
        self.selected.iter().filter_map(|id| self.units.get(id)).map(UnitInfo::from).collect()
    }

    pub fn all_info(&self) -> Vec<UnitInfo> {
        self.units.values().map(UnitInfo::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> UnitRegistry {
        UnitRegistry::new(&UnitConfig::default(), 7)
    }

    #[test]
    fn ids_are_sequential_and_stats_come_from_kind() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Infantry, Vec3::ZERO, Team::Blue);
        let b = r.spawn(UnitKind::HeavyTank, Vec3::X, Team::Red);
        assert_eq!((a, b), (UnitId(1), UnitId(2)));
        let tank = r.get(b).unwrap();
        assert_eq!(tank.speed, 0.08);
        assert_eq!(tank.max_health, 500.0);
        assert_eq!(tank.target, Vec3::X);
    }

    #[test]
    fn select_unknown_id_still_clears() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Scout, Vec3::ZERO, Team::Blue);
        r.select(a);
        r.select(UnitId(99));
        assert_eq!(r.selected_count(), 0);
        assert!(!r.get(a).unwrap().is_selected);
    }

    #[test]
    fn select_many_collapses_duplicates_and_skips_unknown() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Scout, Vec3::ZERO, Team::Blue);
        let b = r.spawn(UnitKind::Medic, Vec3::ZERO, Team::Blue);
        r.select_many([a, b, a, UnitId(42)]);
        assert_eq!(r.selected().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn selection_recolours_and_restores() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Tank, Vec3::ZERO, Team::Red);
        let before = r.get(a).unwrap().display_color();
        r.select(a);
        assert_eq!(r.get(a).unwrap().display_color(), SELECTED_COLOR);
        r.deselect(a);
        assert_eq!(r.get(a).unwrap().display_color(), before);
    }

    #[test]
    fn jittered_targets_stay_within_spread() {
        let mut r = registry();
        let ids: Vec<_> = (0..10).map(|_| r.spawn(UnitKind::Infantry, Vec3::ZERO, Team::Blue)).collect();
        r.select_many(ids.iter().copied());
        let target = Vec3::new(10.0, 0.5, -4.0);
        r.move_selection(target);
        for id in ids {
            let u = r.get(id).unwrap();
            assert!(u.is_moving);
            assert!((u.target.x - target.x).abs() <= 1.0);
            assert!((u.target.z - target.z).abs() <= 1.0);
            assert_eq!(u.target.y, target.y);
        }
    }

    #[test]
    fn move_with_empty_selection_moves_nothing() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Infantry, Vec3::ZERO, Team::Blue);
        r.move_selection(Vec3::splat(5.0));
        assert!(!r.get(a).unwrap().is_moving);
    }

    #[test]
    fn overshoot_snaps_then_stops_next_tick() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Cavalry, Vec3::ZERO, Team::Blue);
        r.move_unit(a, Vec3::new(0.0, 0.0, 0.2));
        r.tick(1.0); // step 15 > 0.2
        let u = r.get(a).unwrap();
        assert_eq!(u.position, u.target);
        assert!(u.is_moving);
        r.tick(1.0);
        assert!(!r.get(a).unwrap().is_moving);
    }

    #[test]
    fn facing_follows_direction() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Infantry, Vec3::ZERO, Team::Blue);
        r.move_unit(a, Vec3::new(10.0, 0.0, 0.0));
        r.tick(1.0 / 60.0);
        let yaw = r.get(a).unwrap().facing_yaw;
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn damage_reports_death_without_removing() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Scout, Vec3::ZERO, Team::Neutral);
        assert_eq!(r.take_damage(a, 30.0), Some(false));
        assert_eq!(r.take_damage(a, 1_000.0), Some(true));
        assert_eq!(r.get(a).unwrap().health, 0.0);
        assert!(r.contains(a));
        assert_eq!(r.take_damage(UnitId(77), 1.0), None);
    }

    #[test]
    fn remove_also_drops_selection() {
        let mut r = registry();
        let a = r.spawn(UnitKind::Scout, Vec3::ZERO, Team::Blue);
        r.select(a);
        assert!(r.remove(a).is_some());
        assert!(!r.has_selection());
        assert!(r.remove(a).is_none());
    }

    #[test]
    fn units_near_sorted_by_distance() {
        let mut r = registry();
        let far = r.spawn(UnitKind::Scout, Vec3::new(0.9, 0.0, 0.0), Team::Blue);
        let near = r.spawn(UnitKind::Scout, Vec3::new(0.1, 0.0, 0.0), Team::Blue);
        r.spawn(UnitKind::Scout, Vec3::new(5.0, 0.0, 0.0), Team::Blue);
        let hits: Vec<_> = r.units_near(Vec3::ZERO, 1.0).into_iter().map(|(id, _)| id).collect();
        assert_eq!(hits, vec![near, far]);
    }

    #[test]
    fn info_snapshots() {
        let mut r = registry();
        let ids = r.spawn_group(
            &[UnitKind::Tank, UnitKind::Medic, UnitKind::Sniper],
            &[Vec3::ZERO, Vec3::X],
            Team::Red,
        );
        assert_eq!(ids.len(), 2);
        r.select(ids[1]);
        let sel = r.selected_info();
        assert_eq!(sel.len(), 1);
        assert_eq!(sel[0].kind, UnitKind::Medic);
        assert_eq!(r.all_info().iter().filter(|i| i.is_selected).count(), 1);
        assert!((r.get(ids[0]).unwrap().health_fraction() - 1.0).abs() < f32::EPSILON);
    }
}
