//! Property tests for measure resolution.
//!
//! 1. A resolved constraint never offers more than the incoming bounded length.
//! 2. Desired size never exceeds a bounded incoming length.
//! 3. Exact incoming + MatchParent yields exactly the incoming length.

use arbor_core::Size;
use arbor_layout::{
    AxisConstraint, LayoutParams, MeasureConstraint, SizePolicy, desired_size, resolve_constraint,
};
use proptest::prelude::*;

fn length() -> impl Strategy<Value = f32> {
    (0u32..4000).prop_map(|v| v as f32 / 2.0)
}

fn axis() -> impl Strategy<Value = AxisConstraint> {
    prop_oneof![
        length().prop_map(AxisConstraint::exact),
        length().prop_map(AxisConstraint::at_most),
        Just(AxisConstraint::UNBOUNDED),
    ]
}

fn policy() -> impl Strategy<Value = SizePolicy> {
    prop_oneof![
        length().prop_map(SizePolicy::Exact),
        Just(SizePolicy::MatchParent),
        Just(SizePolicy::Content),
    ]
}

fn children() -> impl Strategy<Value = Vec<Size>> {
    prop::collection::vec((length(), length()).prop_map(|(w, h)| Size::new(w, h)), 0..6)
}

proptest! {
    #[test]
    fn resolved_never_exceeds_offer(p in policy(), incoming in axis()) {
        let resolved = p.resolve(incoming);
        if incoming.is_bounded() {
            prop_assert!(resolved.is_bounded());
            prop_assert!(resolved.length <= incoming.length);
        }
    }

    #[test]
    fn desired_fits_bounded_offer(
        w in policy(),
        h in policy(),
        width in axis(),
        height in axis(),
        kids in children(),
    ) {
        let params = LayoutParams::new(w, h);
        let available = MeasureConstraint::new(width, height);
        let resolved = resolve_constraint(&params, available);
        let desired = desired_size(&params, resolved, kids);
        if width.is_bounded() {
            prop_assert!(desired.width <= width.length);
        }
        if height.is_bounded() {
            prop_assert!(desired.height <= height.length);
        }
    }

    #[test]
    fn match_parent_under_exact_is_exact(len in length(), kids in children()) {
        let params = LayoutParams::new(SizePolicy::MatchParent, SizePolicy::MatchParent);
        let available = MeasureConstraint::exact(Size::new(len, len));
        let resolved = resolve_constraint(&params, available);
        prop_assert_eq!(desired_size(&params, resolved, kids), Size::new(len, len));
    }
}
