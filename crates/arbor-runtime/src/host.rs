#![forbid(unsafe_code)]

//! The platform host contract.
//!
//! A [`PlatformHost`] owns native surfaces and the native message queue.
//! The application drives it: it registers the window class, creates and
//! destroys surfaces, forwards best-effort requests (repaint, focus, leave
//! tracking), and polls for [`HostMessage`]s to dispatch into the tree.
//!
//! All coordinates and sizes crossing this boundary are device pixels.

use crate::config::WindowClassConfig;
use crate::error::PlatformError;
use arbor_core::{Dpi, MouseButton, SurfaceHandle};
use std::time::Duration;

/// Opaque token for a registered window class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassAtom(pub u32);

/// Outer window rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A native notification for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Paint,
    /// New client size in pixels.
    Resize { width: u32, height: u32 },
    /// The surface is gone. No further notifications follow for it.
    Destroy,
    SetFocus,
    KillFocus,
    MouseMove { x: i32, y: i32 },
    /// The pointer left the client area. Delivered once per tracking request.
    MouseLeave,
    MouseDown { button: MouseButton, x: i32, y: i32 },
    MouseUp { button: MouseButton, x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostMessage {
    pub surface: SurfaceHandle,
    pub notification: Notification,
}

impl HostMessage {
    #[must_use]
    pub const fn new(surface: SurfaceHandle, notification: Notification) -> Self {
        Self {
            surface,
            notification,
        }
    }
}

/// Result of [`PlatformHost::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Message(HostMessage),
    /// The timeout elapsed with nothing to deliver.
    Idle,
    /// The host was asked to quit, or has nothing left to deliver.
    Quit(i32),
}

/// Native windowing services used by the application.
///
/// Requests that name a surface which no longer exists must be ignored.
pub trait PlatformHost {
    fn register_window_class(&mut self, class: &WindowClassConfig)
    -> Result<ClassAtom, PlatformError>;

    /// Create a hidden surface. `client_pixels` of `None` lets the host
    /// choose a default size.
    fn create_surface(
        &mut self,
        class: ClassAtom,
        title: &str,
        client_pixels: Option<(u32, u32)>,
    ) -> Result<SurfaceHandle, PlatformError>;

    /// Begin destroying the surface. The host reports
    /// [`Notification::Destroy`] when it is gone.
    fn destroy_surface(&mut self, surface: SurfaceHandle);

    fn show(&mut self, surface: SurfaceHandle);

    fn hide(&mut self, surface: SurfaceHandle);

    fn request_repaint(&mut self, surface: SurfaceHandle);

    fn request_focus(&mut self, surface: SurfaceHandle);

    /// Arm a single [`Notification::MouseLeave`] for the surface.
    fn track_mouse_leave(&mut self, surface: SurfaceHandle);

    fn client_size(&self, surface: SurfaceHandle) -> Option<(u32, u32)>;

    fn set_client_size(&mut self, surface: SurfaceHandle, width: u32, height: u32);

    fn window_rect(&self, surface: SurfaceHandle) -> Option<PixelRect>;

    fn set_window_rect(&mut self, surface: SurfaceHandle, rect: PixelRect);

    /// Density used to convert between pixels and logical units.
    fn dpi(&self) -> Dpi {
        Dpi::STANDARD
    }

    /// Wait up to `timeout` for the next message. `None` blocks until one
    /// arrives.
    fn poll(&mut self, timeout: Option<Duration>) -> Poll;

    /// Ask the message loop to end with `code`.
    fn post_quit(&mut self, code: i32);
}
