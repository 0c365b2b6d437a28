#![forbid(unsafe_code)]

//! The control arena: structure, geometry, and traversal.
//!
//! # Invariants
//!
//! 1. `child.parent == Some(p)` if and only if `p.children` contains `child`.
//! 2. Windows are roots: a window never has a parent.
//! 3. A control's `window` back-reference is set exactly while the control is
//!    reachable from that window's root through parent links.
//! 4. Every live window's control list is the pre-order walk of its subtree.
//!
//! Failing operations leave the tree untouched.

use crate::args::{PositionChangedEventArgs, SizeChangedEventArgs, UiEventArgs};
use crate::control::{Control, ControlCx, ControlView, base};
use crate::error::TreeError;
use crate::node::{ControlEvents, Node};
use crate::window::HostRequest;
use arbor_core::{FlowControl, Point, Size, TaskQueue};
use arbor_layout::LayoutParams;
use slotmap::SlotMap;
use std::fmt;

slotmap::new_key_type! {
    /// Identifies one control (window or otherwise) in a [`UiTree`].
    pub struct ControlId;
}

/// Owns every control of every window.
pub struct UiTree {
    pub(crate) nodes: SlotMap<ControlId, Node>,
    pub(crate) tasks: TaskQueue<UiTree>,
    pub(crate) host_requests: Vec<HostRequest>,
}

impl UiTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            tasks: TaskQueue::new(),
            host_requests: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Creation and lookup
    // -----------------------------------------------------------------------

    /// Create a detached control.
    pub fn create(&mut self, behavior: impl Control) -> ControlId {
        self.create_boxed(Box::new(behavior))
    }

    pub fn create_boxed(&mut self, behavior: Box<dyn Control>) -> ControlId {
        let id = self.nodes.insert(Node::new(behavior));
        arbor_core::trace!(control = ?id, "control created");
        id
    }

    #[inline]
    pub fn contains(&self, id: ControlId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live controls, windows included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: ControlId) -> Result<&Node, TreeError> {
        self.nodes.get(id).ok_or(TreeError::UnknownControl)
    }

    pub(crate) fn node_mut(&mut self, id: ControlId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::UnknownControl)
    }

    /// Borrow a control's behavior as its concrete type.
    ///
    /// `None` if the id is dead, the type differs, or one of the control's
    /// hooks is currently running.
    pub fn behavior<T: Control>(&self, id: ControlId) -> Option<&T> {
        self.nodes
            .get(id)?
            .behavior
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn behavior_mut<T: Control>(&mut self, id: ControlId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)?
            .behavior
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Run `f` with the control's behavior checked out of the arena.
    ///
    /// Returns `None` when the control is dead or its behavior is already
    /// checked out (a hook re-entering its own control).
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: ControlId,
        f: impl FnOnce(&mut dyn Control, &mut ControlCx<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.nodes.get_mut(id)?.behavior.take()?;
        let result = f(&mut *behavior, &mut ControlCx::new(self, id));
        // The control may have been disposed by its own hook.
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Some(result)
    }

    /// Subscription channels of a control.
    pub fn events(&self, id: ControlId) -> Result<&ControlEvents, TreeError> {
        Ok(&self.node(id)?.events)
    }

    pub fn events_mut(&mut self, id: ControlId) -> Result<&mut ControlEvents, TreeError> {
        Ok(&mut self.node_mut(id)?.events)
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    pub fn parent(&self, id: ControlId) -> Result<Option<ControlId>, TreeError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: ControlId) -> Result<&[ControlId], TreeError> {
        Ok(&self.node(id)?.children)
    }

    /// Snapshot of the children, safe to hold across mutation.
    pub fn get_children(&self, id: ControlId) -> Result<Vec<ControlId>, TreeError> {
        Ok(self.node(id)?.children.clone())
    }

    pub fn child_count(&self, id: ControlId) -> Result<usize, TreeError> {
        Ok(self.node(id)?.children.len())
    }

    /// The window this control is attached to. A window returns itself.
    pub fn window_of(&self, id: ControlId) -> Option<ControlId> {
        self.nodes.get(id)?.window
    }

    pub fn is_window(&self, id: ControlId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_window)
    }

    pub fn is_attached(&self, id: ControlId) -> bool {
        self.window_of(id).is_some()
    }

    /// The window if attached, otherwise the topmost control reached through
    /// parent links (possibly `id` itself).
    pub fn get_ancestor(&self, id: ControlId) -> Result<ControlId, TreeError> {
        let node = self.node(id)?;
        if let Some(window) = node.window {
            return Ok(window);
        }
        let mut current = id;
        while let Some(parent) = self.nodes.get(current).and_then(|node| node.parent) {
            current = parent;
        }
        Ok(current)
    }

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) -> Result<(), TreeError> {
        let position = self.child_count(parent)?;
        self.insert_child(parent, position, child)
    }

    /// Insert `child` at `position` (`0..=child_count`) among `parent`'s
    /// children. If `parent` is attached, the whole subtree is attached to
    /// its window.
    pub fn insert_child(
        &mut self,
        parent: ControlId,
        position: usize,
        child: ControlId,
    ) -> Result<(), TreeError> {
        let len = self.node(parent)?.children.len();
        let child_node = self.node(child)?;
        if child_node.parent.is_some() {
            return Err(TreeError::AlreadyHasParent);
        }
        if child_node.is_window() {
            return Err(TreeError::WindowAsChild);
        }
        if position > len {
            return Err(TreeError::PositionOutOfRange { position, len });
        }
        if child == parent || self.is_strict_ancestor(child, parent) {
            return Err(TreeError::WouldCreateCycle);
        }

        self.node_mut(parent)?.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);
        arbor_core::trace!(parent = ?parent, child = ?child, position, "child added");

        if let Some(window) = self.window_of(parent) {
            self.attach_subtree(child, window);
        }
        Ok(())
    }

    /// Remove `child` from `parent`. The child keeps its own subtree and
    /// becomes a detached root.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> Result<(), TreeError> {
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild)?;
        self.remove_child_at(parent, position).map(|_| ())
    }

    /// Remove and return the child at `position` (`0..child_count`).
    pub fn remove_child_at(
        &mut self,
        parent: ControlId,
        position: usize,
    ) -> Result<ControlId, TreeError> {
        let parent_node = self.node(parent)?;
        let len = parent_node.children.len();
        if position >= len {
            return Err(TreeError::PositionOutOfRange { position, len });
        }
        let window = parent_node.window;

        let child = self.node_mut(parent)?.children.remove(position);
        self.node_mut(child)?.parent = None;
        arbor_core::trace!(parent = ?parent, child = ?child, position, "child removed");

        if let Some(window) = window {
            self.detach_subtree(child, parent, window);
        }
        Ok(child)
    }

    /// Free a detached control and its whole subtree.
    pub fn dispose(&mut self, id: ControlId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if node.parent.is_some() {
            return Err(TreeError::StillAttached);
        }
        if node
            .window_state
            .as_ref()
            .is_some_and(|state| state.surface.is_some())
        {
            return Err(TreeError::LiveWindow);
        }
        self.dispose_subtree(id);
        Ok(())
    }

    pub(crate) fn dispose_subtree(&mut self, id: ControlId) {
        let subtree = self.descendants(id);
        for &control in &subtree {
            self.nodes.remove(control);
        }
        arbor_core::debug!(root = ?id, count = subtree.len(), "subtree disposed");
    }

    fn attach_subtree(&mut self, root: ControlId, window: ControlId) {
        let subtree = self.descendants(root);
        for &id in &subtree {
            if let Some(node) = self.nodes.get_mut(id) {
                node.window = Some(window);
            }
        }
        for &id in &subtree {
            self.with_behavior(id, |behavior, cx| behavior.on_attach(cx, window));
        }
        arbor_core::debug!(root = ?root, window = ?window, count = subtree.len(), "subtree attached");

        self.refresh_control_list(window);
        // Only fails for dead ids; the root was just attached.
        let queued = self.invalidate_position_cache(root);
        debug_assert!(queued.is_ok(), "attached root rejected: {queued:?}");
        if let Err(err) = &queued {
            arbor_core::warn!(root = ?root, error = %err, "attached subtree not queued for refresh");
        }
        self.request_repaint(window);
    }

    fn detach_subtree(&mut self, root: ControlId, parent: ControlId, window: ControlId) {
        let subtree = self.descendants(root);
        for &id in &subtree {
            self.with_behavior(id, |behavior, cx| behavior.on_detach(cx, window));
            if let Some(node) = self.nodes.get_mut(id) {
                node.window = None;
                node.mouse_inside = false;
            }
        }
        arbor_core::debug!(root = ?root, window = ?window, count = subtree.len(), "subtree detached");

        self.release_detached(window, parent);
        self.refresh_control_list(window);
        self.request_repaint(window);
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Pre-order list of `id` and everything below it.
    pub fn descendants(&self, id: ControlId) -> Vec<ControlId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Visit `id` and its descendants in pre-order.
    pub fn traverse_descendants(&self, id: ControlId, mut visitor: impl FnMut(ControlId)) {
        for control in self.descendants(id) {
            visitor(control);
        }
    }

    /// Pre-order visit where [`FlowControl::Break`] skips the visited
    /// control's subtree and its remaining siblings.
    pub fn traverse_descendants_until(
        &self,
        id: ControlId,
        mut visitor: impl FnMut(ControlId) -> FlowControl,
    ) {
        self.traverse_until(id, &mut visitor);
    }

    fn traverse_until(
        &self,
        id: ControlId,
        visitor: &mut dyn FnMut(ControlId) -> FlowControl,
    ) -> FlowControl {
        if visitor(id) == FlowControl::Break {
            return FlowControl::Break;
        }
        if let Some(node) = self.nodes.get(id) {
            for &child in &node.children {
                if self.traverse_until(child, visitor) == FlowControl::Break {
                    break;
                }
            }
        }
        FlowControl::Continue
    }

    /// Visit direct children in order.
    pub fn foreach_child(&self, id: ControlId, mut visitor: impl FnMut(ControlId)) {
        if let Some(node) = self.nodes.get(id) {
            node.children.iter().copied().for_each(&mut visitor);
        }
    }

    /// Visit direct children until the visitor returns [`FlowControl::Break`].
    pub fn foreach_child_until(
        &self,
        id: ControlId,
        mut visitor: impl FnMut(ControlId) -> FlowControl,
    ) {
        if let Some(node) = self.nodes.get(id) {
            for &child in &node.children {
                if visitor(child) == FlowControl::Break {
                    break;
                }
            }
        }
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    pub fn is_strict_ancestor(&self, ancestor: ControlId, id: ControlId) -> bool {
        let mut current = self.nodes.get(id).and_then(|node| node.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(parent).and_then(|node| node.parent);
        }
        false
    }

    /// Chain from the root down to `id` inclusive. Empty for a dead id.
    fn root_path(&self, id: ControlId) -> Vec<ControlId> {
        let mut path = Vec::new();
        let mut current = self.nodes.contains_key(id).then_some(id);
        while let Some(control) = current {
            path.push(control);
            current = self.nodes.get(control).and_then(|node| node.parent);
        }
        path.reverse();
        path
    }

    /// Deepest control that is an ancestor of (or equal to) both `a` and `b`.
    ///
    /// `None` when they belong to different roots. If one is an ancestor of
    /// the other, that one is returned.
    pub fn find_lowest_common_ancestor(&self, a: ControlId, b: ControlId) -> Option<ControlId> {
        let path_a = self.root_path(a);
        let path_b = self.root_path(b);
        if path_a.first()? != path_b.first()? {
            return None;
        }
        path_a
            .iter()
            .zip(&path_b)
            .take_while(|(x, y)| x == y)
            .map(|(x, _)| *x)
            .last()
    }

    /// Whichever of `a` and `b` is an ancestor of (or equal to) the other.
    pub fn is_ancestor_or_descendant(&self, a: ControlId, b: ControlId) -> Option<ControlId> {
        let lca = self.find_lowest_common_ancestor(a, b)?;
        (lca == a || lca == b).then_some(lca)
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Position relative to the parent.
    pub fn position(&self, id: ControlId) -> Result<Point, TreeError> {
        Ok(self.node(id)?.position)
    }

    /// Move a control relative to its parent. Windows stay at their surface
    /// origin; setting their position is ignored.
    pub fn set_position(&mut self, id: ControlId, position: Point) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.is_window() || node.position == position {
            return Ok(());
        }
        let old = std::mem::replace(&mut node.position, position);
        self.invalidate_position_cache(id)?;
        self.raise_position_changed(id, old, position);
        self.request_repaint(id);
        Ok(())
    }

    pub fn size(&self, id: ControlId) -> Result<Size, TreeError> {
        Ok(self.node(id)?.size)
    }

    /// Resize a control. Does not trigger layout.
    pub fn set_size(&mut self, id: ControlId, size: Size) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.size == size {
            return Ok(());
        }
        let old = std::mem::replace(&mut node.size, size);
        self.raise_size_changed(id, old, size);
        self.request_repaint(id);
        Ok(())
    }

    /// Cached offset from the window origin.
    ///
    /// Fresh once the position-cache drain scheduled by the last move has
    /// run.
    pub fn position_absolute(&self, id: ControlId) -> Result<Point, TreeError> {
        Ok(self.node(id)?.absolute_lefttop)
    }

    pub fn local_to_absolute(&self, id: ControlId, point: Point) -> Result<Point, TreeError> {
        Ok(point + self.node(id)?.absolute_lefttop)
    }

    pub fn absolute_to_local(&self, id: ControlId, point: Point) -> Result<Point, TreeError> {
        Ok(point - self.node(id)?.absolute_lefttop)
    }

    /// Whether the pointer is over this control or one of its descendants.
    pub fn is_mouse_inside(&self, id: ControlId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.mouse_inside)
    }

    /// Local hit test through the control's [`Layoutable::is_point_inside`].
    ///
    /// [`Layoutable::is_point_inside`]: crate::Layoutable::is_point_inside
    pub fn is_point_inside(&self, id: ControlId, local: Point) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let view = ControlView::new(self, id);
        match node.behavior.as_deref() {
            Some(behavior) => behavior.is_point_inside(view, local),
            None => base::is_point_inside(view, local),
        }
    }

    fn raise_position_changed(&mut self, id: ControlId, old: Point, new: Point) {
        let mut args = PositionChangedEventArgs {
            ui: UiEventArgs::direct(id),
            old,
            new,
        };
        self.with_behavior(id, |behavior, cx| behavior.on_position_changed(cx, &mut args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.position_changed.raise(&mut args);
        }
    }

    fn raise_size_changed(&mut self, id: ControlId, old: Size, new: Size) {
        let mut args = SizeChangedEventArgs {
            ui: UiEventArgs::direct(id),
            old,
            new,
        };
        self.with_behavior(id, |behavior, cx| behavior.on_size_changed(cx, &mut args));
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.size_changed.raise(&mut args);
        }
    }

    pub fn layout_params(&self, id: ControlId) -> Result<LayoutParams, TreeError> {
        Ok(self.node(id)?.layout_params)
    }

    // -----------------------------------------------------------------------
    // Deferred tasks
    // -----------------------------------------------------------------------

    /// Handle to the FIFO queue that runs deferred tree callbacks.
    pub fn scheduler(&self) -> TaskQueue<UiTree> {
        self.tasks.clone()
    }

    /// Schedule `task` to run once, after every task already queued.
    pub fn invoke_later(&self, task: impl FnOnce(&mut UiTree) + 'static) {
        self.tasks.schedule_once(task);
    }

    /// Run queued tasks (including ones they schedule) until none remain.
    pub fn run_pending_tasks(&mut self) -> usize {
        let tasks = self.tasks.clone();
        tasks.run_pending(self)
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }
}

impl Default for UiTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UiTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiTree")
            .field("controls", &self.nodes.len())
            .field("pending_tasks", &self.tasks.len())
            .field("host_requests", &self.host_requests)
            .finish()
    }
}
