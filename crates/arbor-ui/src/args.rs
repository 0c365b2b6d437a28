#![forbid(unsafe_code)]

//! Argument values carried by control event channels.
//!
//! Every args value records the control currently handling it (`sender`)
//! and the control where dispatch began (`original_sender`). During bubbling
//! a fresh value is built at each step: `sender` walks up the parent chain,
//! `original_sender` stays fixed.

use crate::tree::{ControlId, UiTree};
use arbor_core::{MouseButton, Point, Size};
use arbor_render::DisplayList;

/// Sender pair shared by every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiEventArgs {
    pub sender: ControlId,
    pub original_sender: ControlId,
}

impl UiEventArgs {
    #[must_use]
    pub const fn new(sender: ControlId, original_sender: ControlId) -> Self {
        Self {
            sender,
            original_sender,
        }
    }

    /// Args for an event that does not bubble.
    #[must_use]
    pub const fn direct(control: ControlId) -> Self {
        Self::new(control, control)
    }

    /// Whether this step of the dispatch is the control that started it.
    #[inline]
    pub fn is_original(&self) -> bool {
        self.sender == self.original_sender
    }
}

/// Mouse enter/leave/move.
///
/// `point` is in window (absolute) coordinates. It is `None` for
/// notifications that carry no position, such as a platform leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEventArgs {
    pub ui: UiEventArgs,
    pub point: Option<Point>,
}

impl MouseEventArgs {
    #[must_use]
    pub const fn new(ui: UiEventArgs, point: Option<Point>) -> Self {
        Self { ui, point }
    }

    #[inline]
    pub fn sender(&self) -> ControlId {
        self.ui.sender
    }

    #[inline]
    pub fn original_sender(&self) -> ControlId {
        self.ui.original_sender
    }

    /// The event point in `control`'s local space, or the origin when the
    /// event carries no point or `control` is not live.
    pub fn point_in(&self, tree: &UiTree, control: ControlId) -> Point {
        self.point
            .and_then(|point| tree.absolute_to_local(control, point).ok())
            .unwrap_or(Point::ZERO)
    }
}

/// Mouse button press or release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEventArgs {
    pub mouse: MouseEventArgs,
    pub button: MouseButton,
}

impl MouseButtonEventArgs {
    #[must_use]
    pub const fn new(mouse: MouseEventArgs, button: MouseButton) -> Self {
        Self { mouse, button }
    }

    #[inline]
    pub fn sender(&self) -> ControlId {
        self.mouse.sender()
    }

    #[inline]
    pub fn original_sender(&self) -> ControlId {
        self.mouse.original_sender()
    }

    pub fn point_in(&self, tree: &UiTree, control: ControlId) -> Point {
        self.mouse.point_in(tree, control)
    }
}

/// A control's relative position changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionChangedEventArgs {
    pub ui: UiEventArgs,
    pub old: Point,
    pub new: Point,
}

/// A control's size changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeChangedEventArgs {
    pub ui: UiEventArgs,
    pub old: Size,
    pub new: Size,
}

/// Raised while a control draws.
///
/// Handlers record commands into `display_list`; the tree replays them at
/// the control's transform right after the control's own `on_draw`.
#[derive(Debug)]
pub struct DrawEventArgs {
    pub sender: ControlId,
    pub display_list: DisplayList,
}

impl DrawEventArgs {
    #[must_use]
    pub fn new(sender: ControlId) -> Self {
        Self {
            sender,
            display_list: DisplayList::new(),
        }
    }
}
