//! Property-based invariant tests for geometry primitives.
//!
//! 1. Containment agrees with the edge definitions (half-open).
//! 2. A rectangle never contains its own right/bottom corner.
//! 3. `from_vertices` round-trips right and bottom.
//! 4. Point addition and subtraction are inverse.
//! 5. Pixel → logical → pixel round-trips at integral scale factors.

use arbor_core::{Dpi, Point, Rect};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    (-2000i32..2000).prop_map(|v| v as f32 / 4.0)
}

fn extent() -> impl Strategy<Value = f32> {
    (0i32..2000).prop_map(|v| v as f32 / 4.0)
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (coord(), coord(), extent(), extent()).prop_map(|(l, t, w, h)| Rect::new(l, t, w, h))
}

proptest! {
    #[test]
    fn contains_matches_edges(rect in rect_strategy(), x in coord(), y in coord()) {
        let expected = x >= rect.left && x < rect.right() && y >= rect.top && y < rect.bottom();
        prop_assert_eq!(rect.contains(Point::new(x, y)), expected);
    }

    #[test]
    fn rightbottom_is_outside(rect in rect_strategy()) {
        prop_assert!(!rect.contains(rect.rightbottom()));
    }

    #[test]
    fn from_vertices_round_trips(rect in rect_strategy()) {
        let rebuilt = Rect::from_vertices(rect.left, rect.top, rect.right(), rect.bottom());
        prop_assert_eq!(rebuilt, rect);
    }

    #[test]
    fn point_add_sub_inverse(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
        let a = Point::new(ax, ay);
        let b = Point::new(bx, by);
        prop_assert_eq!((a + b) - b, a);
    }

    #[test]
    fn pixel_round_trip_at_integral_scale(pixel in 0i32..10_000, scale in 1u32..4) {
        let dpi = Dpi::uniform(96.0 * scale as f32);
        let snapped = pixel - pixel % scale as i32;
        prop_assert_eq!(dpi.dip_to_pixel_x(dpi.pixel_to_dip_x(snapped)), snapped);
    }
}
