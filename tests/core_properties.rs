//! Properties of the terrain and unit core that hold for every input.

use bevy::math::{Vec2, Vec3};

use skirmish::config::{GameConfig, TerrainConfig, UnitConfig};
use skirmish::terrain::elevation::{height_at, should_tile_have_elevation, FALLOFF_END};
use skirmish::terrain::{TerrainService, TileKey};
use skirmish::unit::{Team, UnitKind, UnitRegistry};

const TILE: f32 = 20.0;

#[test]
fn tile_elevation_is_a_pure_function_of_coordinates() {
    assert!(!should_tile_have_elevation(0, 0));
    for x in -12..=12 {
        for z in -12..=12 {
            assert_eq!(should_tile_have_elevation(x, z), should_tile_have_elevation(x, z));
        }
    }
    let elevated = (-12..=12)
        .flat_map(|x| (-12..=12).map(move |z| (x, z)))
        .filter(|&(x, z)| should_tile_have_elevation(x, z))
        .count();
    assert!(elevated > 0, "some tiles must be elevated");
}

#[test]
fn elevated_tiles_are_flat_beyond_the_falloff_band() {
    let half_diagonal = std::f32::consts::FRAC_1_SQRT_2;
    let mut checked = 0;
    for x in -6..=6 {
        for z in -6..=6 {
            if !should_tile_have_elevation(x, z) {
                continue;
            }
            let center = TileKey::new(x, z).center(TILE);
            for step in 0..32 {
                let angle = step as f32 / 32.0 * std::f32::consts::TAU;
                // Local radius in tile units, a little past the band edge.
                let r = (FALLOFF_END + 0.01) * half_diagonal;
                let offset = Vec2::new(angle.cos(), angle.sin()) * r * TILE;
                let p = center + offset;
                assert_eq!(height_at(p.x, p.y, TILE), 0.0, "tile ({x},{z}) at {p:?}");
                checked += 1;
            }
        }
    }
    assert!(checked > 0);
}

#[test]
fn service_and_free_function_agree_on_heights() {
    let mut terrain = TerrainService::new(&TerrainConfig::default());
    terrain.ensure_tiles_around(Vec3::ZERO);
    for &(x, z) in &[(3.0, 4.0), (-17.5, 33.2), (41.0, -8.8), (59.9, 59.9)] {
        assert_eq!(terrain.height_at(x, z), height_at(x, z, TILE));
    }
    assert_eq!(terrain.height_at(7.0, 13.0), 0.0, "spawn tile is flat");
}

#[test]
fn movement_terminates_for_every_kind() {
    let mut units = UnitRegistry::new(&UnitConfig::default(), 1);
    let target = Vec3::new(37.0, 0.5, -12.0);
    let ids: Vec<_> = UnitKind::ALL
        .iter()
        .map(|&k| units.spawn(k, Vec3::new(0.0, 0.5, 0.0), Team::Red))
        .collect();
    for &id in &ids {
        units.move_unit(id, target);
    }
    let mut ticks = 0;
    while units.iter().any(|u| u.is_moving) {
        units.tick(1.0 / 30.0);
        ticks += 1;
        assert!(ticks < 10_000, "units never arrived");
    }
    for &id in &ids {
        assert!(units.get(id).unwrap().position.distance(target) < 0.1);
    }
}

#[test]
fn damage_then_heal_stays_in_range() {
    let mut units = UnitRegistry::new(&UnitConfig::default(), 1);
    for kind in UnitKind::ALL {
        let id = units.spawn(kind, Vec3::ZERO, Team::Neutral);
        for amount in [0.0, 1.0, 50.0, 10_000.0] {
            units.take_damage(id, amount);
            units.heal(id, 1.0e9);
            let u = units.get(id).unwrap();
            assert!(u.health >= 0.0 && u.health <= u.max_health);
            assert_eq!(u.health, u.max_health);
        }
        assert_eq!(units.take_damage(id, 1.0e9), Some(true));
        assert_eq!(units.get(id).unwrap().health, 0.0);
    }
}

#[test]
fn select_is_exclusive_and_deselect_restores_colour() {
    let mut units = UnitRegistry::new(&UnitConfig::default(), 1);
    let a = units.spawn(UnitKind::Tank, Vec3::ZERO, Team::Blue);
    let b = units.spawn(UnitKind::Scout, Vec3::X, Team::Red);
    let before = units.get(a).unwrap().display_color();

    units.select(b);
    units.select(a);
    assert_eq!(units.selected().collect::<Vec<_>>(), vec![a]);
    assert_eq!(units.get(b).unwrap().display_color(), Team::Red.color());

    units.deselect(a);
    assert_eq!(units.selected_count(), 0);
    assert_eq!(units.get(a).unwrap().display_color(), before);
}

#[test]
fn shipped_config_matches_defaults() {
    let text = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config/skirmish.config.ron"))
        .expect("config asset present");
    let cfg = GameConfig::from_ron_str(&text).expect("config asset parses");
    let defaults = GameConfig::default();
    assert_eq!(cfg.world_seed, defaults.world_seed);
    assert_eq!(cfg.terrain.visible_radius, defaults.terrain.visible_radius);
    assert_eq!(cfg.input.touch_long_press_ms, defaults.input.touch_long_press_ms);
    assert!((cfg.camera.yaw_limit - defaults.camera.yaw_limit).abs() < 1e-6);
    assert!((cfg.camera.pitch - defaults.camera.pitch).abs() < 1e-6);
}
