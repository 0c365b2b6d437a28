#![forbid(unsafe_code)]

//! Deferred refresh of cached absolute positions.
//!
//! Moving a control does not walk its subtree. The control is queued on its
//! window; the first queued entry schedules one drain on the tree's task
//! queue, and the drain refreshes every queued subtree once.
//!
//! The queue is kept minimal:
//!
//! - a control already queued is not queued again;
//! - a control with a queued ancestor is not queued (the ancestor's refresh
//!   covers it);
//! - queuing a control drops its queued descendants.
//!
//! Absolute positions are fresh by the time the next task or notification
//! after the move is handled, not within the call that moved the control.

use crate::error::TreeError;
use crate::tree::{ControlId, UiTree};
use arbor_core::Point;

impl UiTree {
    /// Queue `id` for an absolute-position refresh on its window.
    ///
    /// A no-op for detached controls: their cache is refreshed when they
    /// are attached.
    pub fn invalidate_position_cache(&mut self, id: ControlId) -> Result<(), TreeError> {
        let Some(window) = self.node(id)?.window else {
            return Ok(());
        };
        let queue = &self.window_state(window)?.position_cache_queue;
        if queue.contains(&id) {
            return Ok(());
        }
        if queue.iter().any(|&queued| self.is_strict_ancestor(queued, id)) {
            return Ok(());
        }

        let was_empty = queue.is_empty();
        let kept: Vec<ControlId> = queue
            .iter()
            .copied()
            .filter(|&queued| !self.is_strict_ancestor(id, queued))
            .collect();

        let state = self.window_state_mut(window)?;
        state.position_cache_queue = kept;
        state.position_cache_queue.push(id);

        if was_empty {
            arbor_core::trace!(window = ?window, "position cache drain scheduled");
            self.tasks.schedule_once(move |tree: &mut UiTree| {
                tree.refresh_position_cache(window);
            });
        }
        Ok(())
    }

    /// Controls waiting for an absolute-position refresh on `window`.
    pub fn pending_position_refresh(&self, window: ControlId) -> Result<&[ControlId], TreeError> {
        Ok(&self.window_state(window)?.position_cache_queue)
    }

    /// Drain `window`'s queue now. Returns how many controls were refreshed.
    ///
    /// Safe to call with an empty queue or a destroyed window.
    pub fn refresh_position_cache(&mut self, window: ControlId) -> usize {
        let span = arbor_core::trace_span!("position_cache_drain", window = ?window);
        let _guard = span.enter();
        let queue = match self.window_state_mut(window) {
            Ok(state) => std::mem::take(&mut state.position_cache_queue),
            Err(_) => return 0,
        };

        let mut refreshed = 0;
        for root in queue {
            // Detached since it was queued.
            if self.window_of(root) != Some(window) {
                continue;
            }
            let origin = self.accumulated_position(root);
            refreshed += self.propagate_absolute(root, origin);
        }
        arbor_core::trace!(window = ?window, refreshed, "position cache drained");
        refreshed
    }

    /// Sum of relative positions from the root down to `id`.
    fn accumulated_position(&self, id: ControlId) -> Point {
        let mut total = Point::ZERO;
        let mut current = Some(id);
        while let Some(control) = current {
            let Some(node) = self.nodes.get(control) else {
                break;
            };
            if !node.is_window() {
                total = total + node.position;
            }
            current = node.parent;
        }
        total
    }

    fn propagate_absolute(&mut self, root: ControlId, origin: Point) -> usize {
        let mut count = 0;
        let mut stack = vec![(root, origin)];
        while let Some((id, absolute)) = stack.pop() {
            let children = match self.nodes.get_mut(id) {
                Some(node) => {
                    node.absolute_lefttop = absolute;
                    node.children.clone()
                }
                None => continue,
            };
            count += 1;
            for &child in children.iter().rev() {
                if let Some(child_node) = self.nodes.get(child) {
                    stack.push((child, absolute + child_node.position));
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::control::Panel;
    use crate::testing::window_with_target;
    use crate::tree::UiTree;
    use arbor_core::Point;

    #[test]
    fn child_then_parent_collapses_to_parent() {
        let mut tree = UiTree::new();
        let window = window_with_target(&mut tree);
        let parent = tree.create(Panel);
        let child = tree.create(Panel);
        tree.add_child(window, parent).unwrap();
        tree.add_child(parent, child).unwrap();
        tree.run_pending_tasks();

        tree.invalidate_position_cache(child).unwrap();
        tree.invalidate_position_cache(parent).unwrap();
        assert_eq!(tree.pending_position_refresh(window).unwrap(), &[parent]);
    }

    #[test]
    fn parent_then_child_keeps_parent() {
        let mut tree = UiTree::new();
        let window = window_with_target(&mut tree);
        let parent = tree.create(Panel);
        let child = tree.create(Panel);
        tree.add_child(window, parent).unwrap();
        tree.add_child(parent, child).unwrap();
        tree.run_pending_tasks();

        tree.invalidate_position_cache(parent).unwrap();
        tree.invalidate_position_cache(child).unwrap();
        tree.invalidate_position_cache(parent).unwrap();
        assert_eq!(tree.pending_position_refresh(window).unwrap(), &[parent]);
    }

    #[test]
    fn one_drain_per_batch() {
        let mut tree = UiTree::new();
        let window = window_with_target(&mut tree);
        let a = tree.create(Panel);
        let b = tree.create(Panel);
        tree.add_child(window, a).unwrap();
        tree.add_child(window, b).unwrap();
        tree.run_pending_tasks();

        tree.set_position(a, Point::new(1.0, 1.0)).unwrap();
        tree.set_position(b, Point::new(2.0, 2.0)).unwrap();
        assert_eq!(tree.scheduler().len(), 1);
        assert_eq!(tree.run_pending_tasks(), 1);
        assert!(tree.pending_position_refresh(window).unwrap().is_empty());
        assert_eq!(tree.position_absolute(b).unwrap(), Point::new(2.0, 2.0));
    }

    #[test]
    fn nested_offsets_accumulate() {
        let mut tree = UiTree::new();
        let window = window_with_target(&mut tree);
        let outer = tree.create(Panel);
        let inner = tree.create(Panel);
        tree.set_position(outer, Point::new(10.0, 20.0)).unwrap();
        tree.set_position(inner, Point::new(3.0, 4.0)).unwrap();
        tree.add_child(outer, inner).unwrap();
        tree.add_child(window, outer).unwrap();
        tree.run_pending_tasks();

        assert_eq!(tree.position_absolute(inner).unwrap(), Point::new(13.0, 24.0));

        tree.set_position(outer, Point::new(0.0, 0.0)).unwrap();
        // Not fresh until the drain runs.
        assert_eq!(tree.position_absolute(inner).unwrap(), Point::new(13.0, 24.0));
        tree.run_pending_tasks();
        assert_eq!(tree.position_absolute(inner).unwrap(), Point::new(3.0, 4.0));
    }

    #[test]
    fn detached_entries_are_skipped() {
        let mut tree = UiTree::new();
        let window = window_with_target(&mut tree);
        let child = tree.create(Panel);
        tree.add_child(window, child).unwrap();
        tree.run_pending_tasks();

        tree.set_position(child, Point::new(5.0, 5.0)).unwrap();
        tree.remove_child(window, child).unwrap();
        tree.run_pending_tasks();
        assert_eq!(tree.position_absolute(child).unwrap(), Point::ZERO);
    }

    #[test]
    fn draining_empty_queue_is_noop() {
        let mut tree = UiTree::new();
        let window = window_with_target(&mut tree);
        assert_eq!(tree.refresh_position_cache(window), 0);
    }
}
