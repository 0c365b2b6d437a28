//! Benchmarks for absolute-position cache invalidation and drains.
//!
//! Run with: cargo bench -p arbor-ui

use arbor_core::{Point, Size, SurfaceHandle};
use arbor_render::RenderBackend;
use arbor_render::headless::RecordingBackend;
use arbor_ui::{ControlId, Panel, UiTree};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A window holding `fanout` columns, each a chain `depth` controls deep.
fn build(fanout: usize, depth: usize) -> (UiTree, ControlId, Vec<ControlId>, Vec<ControlId>) {
    let mut tree = UiTree::new();
    let surface = SurfaceHandle::from_raw(1);
    let target = RecordingBackend::new()
        .create_render_target(surface)
        .expect("headless target");
    let window = tree.create_window(surface, Size::new(1920.0, 1080.0), target);

    let mut heads = Vec::with_capacity(fanout);
    let mut leaves = Vec::with_capacity(fanout);
    for column in 0..fanout {
        let head = tree.create(Panel);
        tree.set_position(head, Point::new(column as f32 * 10.0, 0.0))
            .expect("live control");
        let mut last = head;
        for _ in 1..depth {
            let next = tree.create(Panel);
            tree.set_position(next, Point::new(1.0, 1.0)).expect("live control");
            tree.add_child(last, next).expect("fresh child");
            last = next;
        }
        tree.add_child(window, head).expect("fresh child");
        heads.push(head);
        leaves.push(last);
    }
    tree.run_pending_tasks();
    (tree, window, heads, leaves)
}

// ============================================================================
// Invalidate + drain
// ============================================================================

fn bench_move_heads(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_cache/move_heads");
    for (fanout, depth) in [(10, 10), (50, 20), (200, 5)] {
        let (mut tree, _window, heads, _leaves) = build(fanout, depth);
        let mut offset = 0.0;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{fanout}x{depth}")),
            &(),
            |b, _| {
                b.iter(|| {
                    offset += 1.0;
                    for &head in &heads {
                        tree.set_position(head, Point::new(offset, offset))
                            .expect("live control");
                    }
                    black_box(tree.run_pending_tasks());
                })
            },
        );
    }
    group.finish();
}

fn bench_leaves_then_root_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_cache/leaves_then_heads");
    for (fanout, depth) in [(10, 10), (50, 20)] {
        let (mut tree, _window, heads, leaves) = build(fanout, depth);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{fanout}x{depth}")),
            &(),
            |b, _| {
                b.iter(|| {
                    for &leaf in &leaves {
                        tree.invalidate_position_cache(leaf).expect("live control");
                    }
                    for &head in &heads {
                        tree.invalidate_position_cache(head).expect("live control");
                    }
                    black_box(tree.run_pending_tasks());
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_move_heads, bench_leaves_then_root_collapse);
criterion_main!(benches);
