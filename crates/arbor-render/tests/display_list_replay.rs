//! Display lists replay through any `DrawContext` under its current transform.

use arbor_core::geometry::{Point, Rect};
use arbor_render::headless::{RecordedOp, RecordingBackend};
use arbor_render::{Color, DisplayList, DrawCommand, RenderBackend, Transform};
use proptest::prelude::*;

#[test]
fn replay_preserves_order_and_transform() {
    let mut list = DisplayList::new();
    list.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::BLACK);
    list.draw_line(Point::ZERO, Point::new(4.0, 4.0), Color::WHITE, 1.0);
    list.stroke_rect(Rect::new(1.0, 1.0, 2.0, 2.0), Color::WHITE, 0.5);

    let mut backend = RecordingBackend::new();
    let log = backend.log();
    let cx = backend.context();
    cx.set_transform(Transform::translation(10.0, 10.0));
    list.replay(cx);

    let ops = log.ops();
    assert_eq!(ops.len(), 3);
    assert!(matches!(ops[0], RecordedOp::FillRect { .. }));
    assert!(matches!(ops[1], RecordedOp::Line { .. }));
    assert_eq!(
        ops[2].device_rect(),
        Some(Rect::new(11.0, 11.0, 2.0, 2.0))
    );
}

#[test]
fn empty_list_draws_nothing() {
    let list = DisplayList::new();
    assert!(list.is_empty());
    let mut backend = RecordingBackend::new();
    let log = backend.log();
    list.replay(backend.context());
    assert!(log.is_empty());
}

fn point() -> impl Strategy<Value = Point> + Clone {
    (-200i16..200, -200i16..200).prop_map(|(x, y)| Point::new(f32::from(x), f32::from(y)))
}

fn command() -> impl Strategy<Value = DrawCommand> {
    let rect = (point(), 0u8..64, 0u8..64)
        .prop_map(|(at, w, h)| Rect::new(at.x, at.y, f32::from(w), f32::from(h)));
    let color = any::<u32>().prop_map(|raw| {
        let [r, g, b, a] = raw.to_be_bytes();
        Color::rgba(r, g, b, a)
    });
    prop_oneof![
        (rect.clone(), color.clone()).prop_map(|(rect, color)| DrawCommand::FillRect { rect, color }),
        (rect, color.clone(), 1u8..4).prop_map(|(rect, color, w)| DrawCommand::StrokeRect {
            rect,
            color,
            stroke_width: f32::from(w),
        }),
        (point(), point(), color).prop_map(|(from, to, color)| DrawCommand::Line {
            from,
            to,
            color,
            stroke_width: 1.0,
        }),
    ]
}

proptest! {
    #[test]
    fn nested_offsets_shift_every_replayed_rect(
        commands in prop::collection::vec(command(), 0..12),
        offsets in prop::collection::vec(point(), 1..6),
    ) {
        let mut list = DisplayList::new();
        for command in &commands {
            list.push(*command);
        }

        let mut backend = RecordingBackend::new();
        let log = backend.log();
        let cx = backend.context();
        let mut expected_origin = Point::ZERO;
        for offset in offsets {
            // Each level nests inside the previous one.
            let nested = cx.transform().pre_translate(offset);
            cx.set_transform(nested);
            expected_origin = expected_origin + offset;

            log.clear();
            list.replay(cx);
            let ops = log.ops();
            prop_assert_eq!(ops.len(), commands.len());

            for (command, op) in commands.iter().zip(&ops) {
                match (command, op) {
                    (
                        DrawCommand::FillRect { rect, color },
                        RecordedOp::FillRect { color: drawn, transform, .. },
                    )
                    | (
                        DrawCommand::StrokeRect { rect, color, .. },
                        RecordedOp::StrokeRect { color: drawn, transform, .. },
                    ) => {
                        prop_assert_eq!(drawn, color);
                        prop_assert_eq!(*transform, nested);
                        prop_assert_eq!(
                            op.device_rect(),
                            Some(Rect::from_origin_size(rect.lefttop() + expected_origin, rect.size()))
                        );
                    }
                    (
                        DrawCommand::Line { from, to, color, .. },
                        RecordedOp::Line { from: f, to: t, color: drawn, transform },
                    ) => {
                        prop_assert_eq!((f, t, drawn), (from, to, color));
                        prop_assert_eq!(transform.apply(*from), *from + expected_origin);
                    }
                    _ => prop_assert!(false, "{command:?} replayed as {op:?}"),
                }
            }
        }
    }
}
