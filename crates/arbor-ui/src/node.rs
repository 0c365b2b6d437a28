#![forbid(unsafe_code)]

//! Per-control storage inside the arena.

use crate::args::{
    DrawEventArgs, MouseButtonEventArgs, MouseEventArgs, PositionChangedEventArgs,
    SizeChangedEventArgs, UiEventArgs,
};
use crate::control::Control;
use crate::tree::ControlId;
use arbor_core::{Event, Point, Size, SurfaceHandle};
use arbor_layout::LayoutParams;
use arbor_render::{Color, RenderTarget};
use std::fmt;

/// Public subscription channels of one control.
#[derive(Debug, Default)]
pub struct ControlEvents {
    pub mouse_enter: Event<MouseEventArgs>,
    pub mouse_leave: Event<MouseEventArgs>,
    pub mouse_move: Event<MouseEventArgs>,
    pub mouse_down: Event<MouseButtonEventArgs>,
    pub mouse_up: Event<MouseButtonEventArgs>,
    pub get_focus: Event<UiEventArgs>,
    pub lose_focus: Event<UiEventArgs>,
    pub draw: Event<DrawEventArgs>,
    pub position_changed: Event<PositionChangedEventArgs>,
    pub size_changed: Event<SizeChangedEventArgs>,
}

pub(crate) struct Node {
    pub(crate) parent: Option<ControlId>,
    pub(crate) children: Vec<ControlId>,
    /// Owning window while attached. A window points at itself.
    pub(crate) window: Option<ControlId>,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) desired_size: Size,
    pub(crate) layout_params: LayoutParams,
    /// Offset from the window origin, refreshed by the position-cache drain.
    pub(crate) absolute_lefttop: Point,
    pub(crate) mouse_inside: bool,
    pub(crate) events: ControlEvents,
    /// Checked out while one of its hooks runs.
    pub(crate) behavior: Option<Box<dyn Control>>,
    pub(crate) window_state: Option<Box<WindowState>>,
}

impl Node {
    pub(crate) fn new(behavior: Box<dyn Control>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            window: None,
            position: Point::ZERO,
            size: Size::ZERO,
            desired_size: Size::ZERO,
            layout_params: LayoutParams::default(),
            absolute_lefttop: Point::ZERO,
            mouse_inside: false,
            events: ControlEvents::default(),
            behavior: Some(behavior),
            window_state: None,
        }
    }

    pub(crate) fn is_window(&self) -> bool {
        self.window_state.is_some()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("window", &self.window)
            .field("position", &self.position)
            .field("size", &self.size)
            .field(
                "behavior",
                &self.behavior.as_ref().map(|behavior| behavior.type_name()),
            )
            .field("is_window", &self.is_window())
            .finish()
    }
}

/// State only a window node carries.
pub(crate) struct WindowState {
    /// `None` once the native surface is gone.
    pub(crate) surface: Option<SurfaceHandle>,
    pub(crate) render_target: Option<Box<dyn RenderTarget>>,
    pub(crate) background: Color,
    /// Pre-order list of attached controls, the window first.
    pub(crate) control_list: Vec<ControlId>,
    pub(crate) mouse_hover: Option<ControlId>,
    /// Never empty: the window itself is the default target.
    pub(crate) focus: ControlId,
    /// Whether the native surface currently holds input focus.
    pub(crate) native_focus: bool,
    /// Controls whose absolute position awaits refresh.
    pub(crate) position_cache_queue: Vec<ControlId>,
}

impl WindowState {
    pub(crate) fn new(
        window: ControlId,
        surface: SurfaceHandle,
        render_target: Box<dyn RenderTarget>,
    ) -> Self {
        Self {
            surface: Some(surface),
            render_target: Some(render_target),
            background: Color::WHITE,
            control_list: vec![window],
            mouse_hover: None,
            focus: window,
            native_focus: false,
            position_cache_queue: Vec::new(),
        }
    }
}
