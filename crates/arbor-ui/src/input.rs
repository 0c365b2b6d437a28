#![forbid(unsafe_code)]

//! Hit testing, focus, and bubbling mouse dispatch.
//!
//! Each event has two steps. The *core* step (`raise_*`) is not
//! overridable: it updates the tree's own bookkeeping, calls the control's
//! hook, then raises the public channel. Dispatch runs the core step on the
//! originating control and then on each ancestor, up to an optional
//! boundary.
//!
//! Enter/leave use the lowest common ancestor of the old and new hover
//! targets as the boundary, so moving into a nested descendant raises
//! enter only on the controls the pointer actually entered.

use crate::args::{MouseButtonEventArgs, MouseEventArgs, UiEventArgs};
use crate::error::TreeError;
use crate::tree::{ControlId, UiTree};
use crate::window::HostRequest;
use arbor_core::{MouseButton, Point};

impl UiTree {
    // -----------------------------------------------------------------------
    // Bubbling
    // -----------------------------------------------------------------------

    /// Run `core` on `origin` and then on each ancestor, stopping before
    /// `stop` (or after the root when `stop` is `None`).
    ///
    /// `make_args` builds a fresh args value per step; `sender` is the
    /// current control, `original_sender` is always `origin`.
    pub fn dispatch_bubbling<A>(
        &mut self,
        origin: ControlId,
        stop: Option<ControlId>,
        mut make_args: impl FnMut(UiEventArgs) -> A,
        mut core: impl FnMut(&mut UiTree, ControlId, &mut A),
    ) {
        let mut current = Some(origin);
        while let Some(id) = current {
            if Some(id) == stop {
                break;
            }
            let mut args = make_args(UiEventArgs::new(id, origin));
            core(self, id, &mut args);
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
    }

    // -----------------------------------------------------------------------
    // Core steps
    // -----------------------------------------------------------------------

    /// Mark the pointer inside `id`, then hook, then channel.
    pub fn raise_mouse_enter(&mut self, id: ControlId, args: &mut MouseEventArgs) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.mouse_inside = true;
        self.with_behavior(id, |behavior, cx| behavior.on_mouse_enter(cx, args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.mouse_enter.raise(args);
        }
    }

    /// Mark the pointer outside `id`, then hook, then channel.
    pub fn raise_mouse_leave(&mut self, id: ControlId, args: &mut MouseEventArgs) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.mouse_inside = false;
        self.with_behavior(id, |behavior, cx| behavior.on_mouse_leave(cx, args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.mouse_leave.raise(args);
        }
    }

    pub fn raise_mouse_move(&mut self, id: ControlId, args: &mut MouseEventArgs) {
        self.with_behavior(id, |behavior, cx| behavior.on_mouse_move(cx, args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.mouse_move.raise(args);
        }
    }

    pub fn raise_mouse_down(&mut self, id: ControlId, args: &mut MouseButtonEventArgs) {
        self.with_behavior(id, |behavior, cx| behavior.on_mouse_down(cx, args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.mouse_down.raise(args);
        }
    }

    pub fn raise_mouse_up(&mut self, id: ControlId, args: &mut MouseButtonEventArgs) {
        self.with_behavior(id, |behavior, cx| behavior.on_mouse_up(cx, args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.mouse_up.raise(args);
        }
    }

    /// Focus events go to the control itself only; they do not bubble.
    pub fn raise_get_focus(&mut self, id: ControlId) {
        let mut args = UiEventArgs::direct(id);
        self.with_behavior(id, |behavior, cx| behavior.on_get_focus(cx, &mut args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.get_focus.raise(&mut args);
        }
    }

    pub fn raise_lose_focus(&mut self, id: ControlId) {
        let mut args = UiEventArgs::direct(id);
        self.with_behavior(id, |behavior, cx| behavior.on_lose_focus(cx, &mut args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.lose_focus.raise(&mut args);
        }
    }

    // -----------------------------------------------------------------------
    // Hit testing
    // -----------------------------------------------------------------------

    /// Topmost control under `point` (window coordinates).
    ///
    /// Later controls in pre-order are on top. Falls back to the window.
    pub fn hit_test(&self, window: ControlId, point: Point) -> Result<ControlId, TreeError> {
        let state = self.window_state(window)?;
        for &id in state.control_list.iter().rev() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if self.is_point_inside(id, point - node.absolute_lefttop) {
                return Ok(id);
            }
        }
        Ok(window)
    }

    // -----------------------------------------------------------------------
    // Mouse notifications
    // -----------------------------------------------------------------------

    /// Native pointer move at `point` (logical window coordinates).
    pub fn handle_mouse_move(&mut self, window: ControlId, point: Point) -> Result<(), TreeError> {
        let state = self.window_state(window)?;
        let old_hover = state.mouse_hover;
        if let (None, Some(surface)) = (old_hover, state.surface) {
            self.push_host_request(HostRequest::TrackMouseLeave(surface));
        }

        let target = self.hit_test(window, point)?;
        let make = |ui| MouseEventArgs::new(ui, Some(point));

        if old_hover != Some(target) {
            let boundary = old_hover.and_then(|old| self.find_lowest_common_ancestor(old, target));
            arbor_core::trace!(window = ?window, from = ?old_hover, to = ?target, boundary = ?boundary, "hover changed");
            if let Some(old) = old_hover {
                self.dispatch_bubbling(old, boundary, make, UiTree::raise_mouse_leave);
            }
            self.window_state_mut(window)?.mouse_hover = Some(target);
            self.dispatch_bubbling(target, boundary, make, UiTree::raise_mouse_enter);
        }

        self.dispatch_bubbling(target, None, make, UiTree::raise_mouse_move);
        Ok(())
    }

    /// The pointer left the native surface.
    pub fn handle_mouse_leave(&mut self, window: ControlId) -> Result<(), TreeError> {
        let Some(hover) = self.window_state_mut(window)?.mouse_hover.take() else {
            return Ok(());
        };
        arbor_core::trace!(window = ?window, from = ?hover, "pointer left window");
        self.dispatch_bubbling(
            hover,
            None,
            |ui| MouseEventArgs::new(ui, None),
            UiTree::raise_mouse_leave,
        );
        Ok(())
    }

    pub fn handle_mouse_down(
        &mut self,
        window: ControlId,
        button: MouseButton,
        point: Point,
    ) -> Result<(), TreeError> {
        let target = self.hit_test(window, point)?;
        arbor_core::trace!(window = ?window, target = ?target, ?button, "mouse down");
        self.dispatch_bubbling(
            target,
            None,
            |ui| MouseButtonEventArgs::new(MouseEventArgs::new(ui, Some(point)), button),
            UiTree::raise_mouse_down,
        );
        Ok(())
    }

    pub fn handle_mouse_up(
        &mut self,
        window: ControlId,
        button: MouseButton,
        point: Point,
    ) -> Result<(), TreeError> {
        let target = self.hit_test(window, point)?;
        arbor_core::trace!(window = ?window, target = ?target, ?button, "mouse up");
        self.dispatch_bubbling(
            target,
            None,
            |ui| MouseButtonEventArgs::new(MouseEventArgs::new(ui, Some(point)), button),
            UiTree::raise_mouse_up,
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// Move focus to `target` within `window`.
    ///
    /// Returns `Ok(false)` when the surface is gone. While the surface does
    /// not hold native focus, the target is only recorded and native focus
    /// is requested; focus events follow when the host confirms it.
    pub fn request_focus_for(
        &mut self,
        window: ControlId,
        target: ControlId,
    ) -> Result<bool, TreeError> {
        self.node(target)?;
        let state = self.window_state(window)?;
        if self.window_of(target) != Some(window) {
            return Err(TreeError::NotInWindow);
        }
        let Some(surface) = state.surface else {
            return Ok(false);
        };

        if !state.native_focus {
            self.window_state_mut(window)?.focus = target;
            self.push_host_request(HostRequest::Focus(surface));
            return Ok(true);
        }

        let old = state.focus;
        if old == target {
            return Ok(true);
        }
        arbor_core::trace!(window = ?window, from = ?old, to = ?target, "focus moved");
        self.raise_lose_focus(old);
        self.raise_get_focus(target);
        self.window_state_mut(window)?.focus = target;
        Ok(true)
    }

    /// Request focus for `id` in whatever window it is attached to.
    /// `Ok(false)` when detached.
    pub fn request_focus(&mut self, id: ControlId) -> Result<bool, TreeError> {
        let Some(window) = self.node(id)?.window else {
            return Ok(false);
        };
        self.request_focus_for(window, id)
    }

    /// Whether `id` is its window's focus target.
    pub fn has_focus(&self, id: ControlId) -> bool {
        self.window_of(id)
            .and_then(|window| self.window_state(window).ok())
            .is_some_and(|state| state.focus == id)
    }

    /// The native surface gained input focus.
    pub fn handle_set_focus(&mut self, window: ControlId) -> Result<(), TreeError> {
        let state = self.window_state_mut(window)?;
        state.native_focus = true;
        let focus = state.focus;
        self.raise_get_focus(focus);
        Ok(())
    }

    /// The native surface lost input focus.
    pub fn handle_kill_focus(&mut self, window: ControlId) -> Result<(), TreeError> {
        let state = self.window_state_mut(window)?;
        state.native_focus = false;
        let focus = state.focus;
        self.raise_lose_focus(focus);
        Ok(())
    }
}
