#![forbid(unsafe_code)]

//! Window roots: native-surface bookkeeping, the flattened control list,
//! resize and destroy handling, and the host request outbox.
//!
//! A window is a control whose node carries window state. It is always a
//! root, it is its own `window_of`, and it is the fallback hit-test and
//! focus target.

use crate::control::Panel;
use crate::error::{TreeError, UiError};
use crate::node::{Node, WindowState};
use crate::tree::{ControlId, UiTree};
use arbor_core::{Size, SurfaceHandle};
use arbor_layout::{LayoutParams, SizePolicy};
use arbor_render::{Color, RenderTarget};

/// A native call the tree needs made on its behalf.
///
/// Queued while handling a notification and flushed by the run loop.
/// Requests for a surface that is no longer valid are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostRequest {
    /// Deliver one leave notification when the pointer exits the surface.
    TrackMouseLeave(SurfaceHandle),
    /// Give the surface native input focus.
    Focus(SurfaceHandle),
    /// Schedule a paint of the surface.
    Repaint(SurfaceHandle),
}

impl HostRequest {
    pub fn surface(&self) -> SurfaceHandle {
        match *self {
            Self::TrackMouseLeave(surface) | Self::Focus(surface) | Self::Repaint(surface) => {
                surface
            }
        }
    }
}

impl UiTree {
    /// Create a window root bound to `surface` with a client area of
    /// `client_size` logical units.
    pub fn create_window(
        &mut self,
        surface: SurfaceHandle,
        client_size: Size,
        render_target: Box<dyn RenderTarget>,
    ) -> ControlId {
        let id = self.nodes.insert_with_key(|id| {
            let mut node = Node::new(Box::new(Panel));
            node.window = Some(id);
            node.size = client_size;
            node.layout_params = LayoutParams::new(SizePolicy::MatchParent, SizePolicy::MatchParent);
            node.window_state = Some(Box::new(WindowState::new(id, surface, render_target)));
            node
        });
        arbor_core::debug!(window = ?id, %surface, width = client_size.width, height = client_size.height, "window created");
        id
    }

    pub(crate) fn window_state(&self, window: ControlId) -> Result<&WindowState, TreeError> {
        self.node(window)?
            .window_state
            .as_deref()
            .ok_or(TreeError::NotAWindow)
    }

    pub(crate) fn window_state_mut(
        &mut self,
        window: ControlId,
    ) -> Result<&mut WindowState, TreeError> {
        self.node_mut(window)?
            .window_state
            .as_deref_mut()
            .ok_or(TreeError::NotAWindow)
    }

    /// The native surface, or `None` once it was destroyed.
    pub fn surface(&self, window: ControlId) -> Result<Option<SurfaceHandle>, TreeError> {
        Ok(self.window_state(window)?.surface)
    }

    pub fn is_window_valid(&self, window: ControlId) -> bool {
        self.window_state(window)
            .is_ok_and(|state| state.surface.is_some())
    }

    pub fn background(&self, window: ControlId) -> Result<Color, TreeError> {
        Ok(self.window_state(window)?.background)
    }

    pub fn set_background(&mut self, window: ControlId, color: Color) -> Result<(), TreeError> {
        self.window_state_mut(window)?.background = color;
        self.request_repaint(window);
        Ok(())
    }

    /// Pre-order list of attached controls, the window first.
    pub fn control_list(&self, window: ControlId) -> Result<&[ControlId], TreeError> {
        Ok(&self.window_state(window)?.control_list)
    }

    /// Rebuild the flattened control list from the window's subtree.
    pub fn refresh_control_list(&mut self, window: ControlId) {
        let list = self.descendants(window);
        if let Ok(state) = self.window_state_mut(window) {
            state.control_list = list;
        }
    }

    pub fn mouse_hover(&self, window: ControlId) -> Result<Option<ControlId>, TreeError> {
        Ok(self.window_state(window)?.mouse_hover)
    }

    /// The control that receives focus events. Defaults to the window.
    pub fn focused_control(&self, window: ControlId) -> Result<ControlId, TreeError> {
        Ok(self.window_state(window)?.focus)
    }

    /// Whether the native surface currently holds input focus.
    pub fn has_native_focus(&self, window: ControlId) -> Result<bool, TreeError> {
        Ok(self.window_state(window)?.native_focus)
    }

    /// Drop focus and queued refreshes that point at controls no longer
    /// attached to `window`. A detached hover target hands hover to
    /// `detached_from`, the still-attached parent it was removed from, whose
    /// chain is still marked inside.
    pub(crate) fn release_detached(&mut self, window: ControlId, detached_from: ControlId) {
        let Ok(state) = self.window_state(window) else {
            return;
        };
        let hover_lost = state
            .mouse_hover
            .is_some_and(|hover| self.window_of(hover) != Some(window));
        let old_focus = state.focus;
        let focus_lost = self.window_of(old_focus) != Some(window);
        let native_focus = state.native_focus;
        let queue: Vec<ControlId> = state
            .position_cache_queue
            .iter()
            .copied()
            .filter(|&queued| self.window_of(queued) == Some(window))
            .collect();

        let Ok(state) = self.window_state_mut(window) else {
            return;
        };
        state.position_cache_queue = queue;
        if hover_lost {
            state.mouse_hover = Some(detached_from);
            arbor_core::trace!(window = ?window, to = ?detached_from, "hovered control detached");
        }
        if focus_lost {
            state.focus = window;
            arbor_core::debug!(window = ?window, "focused control detached, focus returned to window");
            if native_focus {
                self.raise_lose_focus(old_focus);
                self.raise_get_focus(window);
            }
        }
    }

    /// Apply a native resize: reallocate the backbuffer to `pixel_size`,
    /// record the new logical client size, and lay the window out again.
    pub fn handle_resize(
        &mut self,
        window: ControlId,
        pixel_size: (u32, u32),
        client_size: Size,
    ) -> Result<(), UiError> {
        if let Some(target) = self.window_state_mut(window)?.render_target.as_deref_mut() {
            target.resize_buffer(pixel_size.0, pixel_size.1)?;
        }
        arbor_core::trace!(window = ?window, width = pixel_size.0, height = pixel_size.1, "window resized");
        self.set_size(window, client_size)?;
        self.recalculate_layout(window)?;
        Ok(())
    }

    /// Mark the native surface as gone without freeing the window. Later
    /// native requests for it become no-ops. Returns the surface that was
    /// bound, for unregistration.
    pub fn invalidate_surface(
        &mut self,
        window: ControlId,
    ) -> Result<Option<SurfaceHandle>, TreeError> {
        let state = self.window_state_mut(window)?;
        let surface = state.surface.take();
        state.render_target = None;
        state.native_focus = false;
        self.host_requests
            .retain(|request| Some(request.surface()) != surface);
        Ok(surface)
    }

    /// The native surface is gone: free the window and everything attached
    /// to it. Returns the surface that was bound, for unregistration.
    pub fn destroy_window(&mut self, window: ControlId) -> Result<Option<SurfaceHandle>, TreeError> {
        let surface = self.invalidate_surface(window)?;
        self.dispose_subtree(window);
        arbor_core::debug!(window = ?window, "window destroyed");
        Ok(surface)
    }

    /// Ask the host to repaint the window `id` belongs to. No-op when
    /// detached or the surface is gone.
    pub fn request_repaint(&mut self, id: ControlId) {
        let Some(window) = self.window_of(id) else {
            return;
        };
        if let Ok(Some(surface)) = self.surface(window) {
            self.push_host_request(HostRequest::Repaint(surface));
        }
    }

    pub(crate) fn push_host_request(&mut self, request: HostRequest) {
        if !self.host_requests.contains(&request) {
            self.host_requests.push(request);
        }
    }

    /// Requests queued since the last call, oldest first.
    pub fn take_host_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.host_requests)
    }

    pub fn pending_host_requests(&self) -> &[HostRequest] {
        &self.host_requests
    }
}
