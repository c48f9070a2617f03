// src/selection/geometry.rs
//! Screen-space helpers shared by the selection strategies.

use bevy::prelude::*;

/// Inclusive axis-aligned box from two arbitrary corners.
pub fn screen_rect(a: Vec2, b: Vec2) -> Rect {
    Rect::from_corners(a, b)
}

/// Inclusive containment (a point on an edge is inside).
#[inline]
pub fn rect_contains(rect: &Rect, p: Vec2) -> bool {
    p.x >= rect.min.x && p.x <= rect.max.x && p.y >= rect.min.y && p.y <= rect.max.y
}

/// Even-odd rule via horizontal ray casting. Works on open or closed rings.
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_any_corner_order() {
        let r = screen_rect(Vec2::new(60.0, 10.0), Vec2::new(0.0, 70.0));
        assert_eq!(r.min, Vec2::new(0.0, 10.0));
        assert_eq!(r.max, Vec2::new(60.0, 70.0));
        assert!(rect_contains(&r, Vec2::new(60.0, 70.0)));
        assert!(!rect_contains(&r, Vec2::new(60.1, 70.0)));
    }

    #[test]
    fn triangle_containment() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(0.0, 100.0)];
        assert!(point_in_polygon(Vec2::new(10.0, 10.0), &tri));
        assert!(!point_in_polygon(Vec2::new(80.0, 80.0), &tri));
        assert!(!point_in_polygon(Vec2::new(-1.0, 5.0), &tri));
    }

    #[test]
    fn self_intersecting_ring_uses_even_odd() {
        // Bow-tie: the crossing region counts once per lobe.
        let bow = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(1.0, 5.0), &bow));
        assert!(point_in_polygon(Vec2::new(9.0, 5.0), &bow));
        assert!(!point_in_polygon(Vec2::new(5.0, 1.0), &bow));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
        assert!(!point_in_polygon(Vec2::ZERO, &[Vec2::ZERO, Vec2::ONE]));
    }
}
