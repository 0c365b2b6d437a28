#![forbid(unsafe_code)]

//! Control behavior: the capability traits a control implements.
//!
//! A control's state (parent, children, geometry, channels) lives in the
//! [`UiTree`] arena. Its behavior is a boxed value implementing three small
//! traits:
//!
//! - [`Drawable`] - paints the control's own content
//! - [`Layoutable`] - measure, arrange, and the local hit test
//! - [`InputTarget`] - mouse, focus, attach/detach, and geometry hooks
//!
//! Every hook has a default. Defaults with a body live in [`base`] so an
//! override can run its own logic and then chain to them.
//!
//! Hooks are the *user* step of dispatch. The tree's internal step (hover
//! and focus bookkeeping, raising the public channel) always runs, whether
//! or not a hook is overridden.

use crate::args::{
    MouseButtonEventArgs, MouseEventArgs, PositionChangedEventArgs, SizeChangedEventArgs,
    UiEventArgs,
};
use crate::tree::{ControlId, UiTree};
use arbor_core::{Point, Rect, Size};
use arbor_layout::{LayoutParams, MeasureConstraint};
use arbor_render::DrawContext;
use std::any::Any;

/// Mutable access to the tree from inside a hook, scoped to one control.
///
/// While a hook runs, that control's behavior is checked out of the arena.
/// Tree operations on *other* controls work normally; hooks re-entering
/// their own control see the default behavior.
pub struct ControlCx<'a> {
    tree: &'a mut UiTree,
    id: ControlId,
}

impl<'a> ControlCx<'a> {
    pub(crate) fn new(tree: &'a mut UiTree, id: ControlId) -> Self {
        Self { tree, id }
    }

    #[inline]
    pub fn id(&self) -> ControlId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &UiTree {
        self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut UiTree {
        self.tree
    }

    pub fn view(&self) -> ControlView<'_> {
        ControlView::new(self.tree, self.id)
    }

    pub fn size(&self) -> Size {
        self.tree.size(self.id).unwrap_or(Size::ZERO)
    }

    pub fn layout_params(&self) -> LayoutParams {
        self.tree.layout_params(self.id).unwrap_or_default()
    }

    /// Snapshot of this control's children.
    pub fn children(&self) -> Vec<ControlId> {
        self.tree.get_children(self.id).unwrap_or_default()
    }

    /// Measure a child and return (and record) its desired size.
    pub fn measure_child(&mut self, child: ControlId, available: MeasureConstraint) -> Size {
        self.tree.measure(child, available).unwrap_or(Size::ZERO)
    }

    /// Place a child at `rect`, relative to this control.
    pub fn layout_child(&mut self, child: ControlId, rect: Rect) {
        // Only fails for dead ids; a stale child simply isn't placed.
        let _ = self.tree.layout(child, rect);
    }

    pub fn desired_size_of(&self, child: ControlId) -> Size {
        self.tree.desired_size(child).unwrap_or(Size::ZERO)
    }

    /// Ask for input focus. `false` when detached or the surface is gone.
    pub fn request_focus(&mut self) -> bool {
        self.tree.request_focus(self.id).unwrap_or(false)
    }

    pub fn has_focus(&self) -> bool {
        self.tree.has_focus(self.id)
    }
}

/// Read-only access to the tree, scoped to one control.
#[derive(Clone, Copy)]
pub struct ControlView<'a> {
    tree: &'a UiTree,
    id: ControlId,
}

impl<'a> ControlView<'a> {
    pub(crate) fn new(tree: &'a UiTree, id: ControlId) -> Self {
        Self { tree, id }
    }

    #[inline]
    pub fn id(&self) -> ControlId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &'a UiTree {
        self.tree
    }

    pub fn size(&self) -> Size {
        self.tree.size(self.id).unwrap_or(Size::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Paints a control's own content.
pub trait Drawable {
    /// Draw in local coordinates; the context's transform already includes
    /// this control's position. Children are drawn by the tree afterwards.
    ///
    /// Default: draws nothing.
    fn on_draw(&mut self, cx: &mut ControlCx<'_>, dc: &mut dyn DrawContext) {
        base::draw(cx, dc);
    }
}

/// Participates in measure/arrange and local hit testing.
pub trait Layoutable {
    /// Report the size this control wants given `available`.
    ///
    /// Default: [`base::measure`], the composite rule.
    fn on_measure(&mut self, cx: &mut ControlCx<'_>, available: MeasureConstraint) -> Size {
        base::measure(cx, available)
    }

    /// Position children after this control's own rect was set.
    ///
    /// Default: no-op.
    fn on_layout(&mut self, cx: &mut ControlCx<'_>, rect: Rect) {
        base::layout(cx, rect);
    }

    /// Whether `point` (local coordinates) hits this control.
    ///
    /// Default: [`base::is_point_inside`], the local bounding box.
    fn is_point_inside(&self, view: ControlView<'_>, point: Point) -> bool {
        base::is_point_inside(view, point)
    }
}

/// Mouse, focus, attach/detach, and geometry hooks. All default to no-ops.
#[allow(unused_variables)]
pub trait InputTarget {
    /// The control (or an ancestor) was attached to `window`.
    fn on_attach(&mut self, cx: &mut ControlCx<'_>, window: ControlId) {}

    /// The control (or an ancestor) was detached from `window`.
    fn on_detach(&mut self, cx: &mut ControlCx<'_>, window: ControlId) {}

    fn on_mouse_enter(&mut self, cx: &mut ControlCx<'_>, args: &mut MouseEventArgs) {}

    fn on_mouse_leave(&mut self, cx: &mut ControlCx<'_>, args: &mut MouseEventArgs) {}

    fn on_mouse_move(&mut self, cx: &mut ControlCx<'_>, args: &mut MouseEventArgs) {}

    fn on_mouse_down(&mut self, cx: &mut ControlCx<'_>, args: &mut MouseButtonEventArgs) {}

    fn on_mouse_up(&mut self, cx: &mut ControlCx<'_>, args: &mut MouseButtonEventArgs) {}

    fn on_get_focus(&mut self, cx: &mut ControlCx<'_>, args: &mut UiEventArgs) {}

    fn on_lose_focus(&mut self, cx: &mut ControlCx<'_>, args: &mut UiEventArgs) {}

    fn on_position_changed(&mut self, cx: &mut ControlCx<'_>, args: &mut PositionChangedEventArgs) {}

    fn on_size_changed(&mut self, cx: &mut ControlCx<'_>, args: &mut SizeChangedEventArgs) {}
}

/// A control behavior: the union of the capability traits.
///
/// Implemented for every `'static` type that implements all three.
pub trait Control: Drawable + Layoutable + InputTarget + Any {
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Drawable + Layoutable + InputTarget + Any> Control for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A plain composite control: measures as the largest child, leaves
/// children where they are placed, draws nothing. Windows use it as their
/// root behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panel;

impl Drawable for Panel {}
impl Layoutable for Panel {}
impl InputTarget for Panel {}

/// Default hook bodies, callable from overrides.
pub mod base {
    use super::{ControlCx, ControlView};
    use arbor_core::{Point, Rect, Size};
    use arbor_layout::{MeasureConstraint, desired_size, resolve_constraint};
    use arbor_render::DrawContext;

    /// Composite measure: resolve this control's constraint against
    /// `available`, measure every child against it, and size content-driven
    /// axes to the largest child.
    ///
    /// Padding and margin are carried but not subtracted here.
    pub fn measure(cx: &mut ControlCx<'_>, available: MeasureConstraint) -> Size {
        let params = cx.layout_params();
        let resolved = resolve_constraint(&params, available);
        let children = cx.children();
        let sizes: Vec<Size> = children
            .into_iter()
            .map(|child| cx.measure_child(child, resolved))
            .collect();
        desired_size(&params, resolved, sizes)
    }

    /// Arrange: no-op.
    pub fn layout(_cx: &mut ControlCx<'_>, _rect: Rect) {}

    /// Draw: no-op.
    pub fn draw(_cx: &mut ControlCx<'_>, _dc: &mut dyn DrawContext) {}

    /// Local bounding-box test against the control's size.
    pub fn is_point_inside(view: ControlView<'_>, point: Point) -> bool {
        Rect::from_origin_size(Point::ZERO, view.size()).contains(point)
    }
}
