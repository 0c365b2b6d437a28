#![forbid(unsafe_code)]

//! In-memory [`PlatformHost`] for tests and headless runs.
//!
//! `HeadlessHost` records every call it receives and simulates the parts of
//! a native window system the tree depends on: destroy, repaint, focus
//! changes, resizes, and one-shot leave tracking all turn into queued
//! [`HostMessage`]s, delivered by [`PlatformHost::poll`] in order.

use crate::config::WindowClassConfig;
use crate::error::PlatformError;
use crate::host::{ClassAtom, HostMessage, Notification, PixelRect, PlatformHost, Poll};
use arbor_core::{Dpi, MouseButton, SurfaceHandle};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Client size used when a surface is created without one.
pub const DEFAULT_CLIENT_SIZE: (u32, u32) = (640, 480);

/// A call made on the host, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    RegisterClass(String),
    CreateSurface(SurfaceHandle),
    DestroySurface(SurfaceHandle),
    Show(SurfaceHandle),
    Hide(SurfaceHandle),
    Repaint(SurfaceHandle),
    Focus(SurfaceHandle),
    TrackMouseLeave(SurfaceHandle),
    SetClientSize(SurfaceHandle, u32, u32),
    SetWindowRect(SurfaceHandle, PixelRect),
    PostQuit(i32),
}

/// State of one simulated surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub title: String,
    pub client_size: (u32, u32),
    pub window_rect: PixelRect,
    pub visible: bool,
    pub tracking_leave: bool,
}

#[derive(Debug)]
pub struct HeadlessHost {
    surfaces: BTreeMap<SurfaceHandle, HeadlessSurface>,
    messages: VecDeque<HostMessage>,
    calls: Vec<HostCall>,
    dpi: Dpi,
    next_surface: u64,
    next_atom: u32,
    focused: Option<SurfaceHandle>,
    quit: Option<i32>,
    fail_class: Option<String>,
    fail_surface: Option<String>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::with_dpi(Dpi::STANDARD)
    }

    #[must_use]
    pub fn with_dpi(dpi: Dpi) -> Self {
        Self {
            surfaces: BTreeMap::new(),
            messages: VecDeque::new(),
            calls: Vec::new(),
            dpi,
            next_surface: 0x100,
            next_atom: 1,
            focused: None,
            quit: None,
            fail_class: None,
            fail_surface: None,
        }
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn surface(&self, surface: SurfaceHandle) -> Option<&HeadlessSurface> {
        self.surfaces.get(&surface)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn focused(&self) -> Option<SurfaceHandle> {
        self.focused
    }

    /// Messages not yet delivered by `poll`.
    pub fn pending(&self) -> impl Iterator<Item = &HostMessage> {
        self.messages.iter()
    }

    /// The next class registration fails with `reason`.
    pub fn fail_class_registration(&mut self, reason: impl Into<String>) {
        self.fail_class = Some(reason.into());
    }

    /// The next surface creation fails with `reason`.
    pub fn fail_next_surface(&mut self, reason: impl Into<String>) {
        self.fail_surface = Some(reason.into());
    }

    /// Queue a raw notification for `surface`.
    pub fn push(&mut self, surface: SurfaceHandle, notification: Notification) {
        self.messages.push_back(HostMessage::new(surface, notification));
    }

    pub fn pointer_move(&mut self, surface: SurfaceHandle, x: i32, y: i32) {
        self.push(surface, Notification::MouseMove { x, y });
    }

    pub fn pointer_down(&mut self, surface: SurfaceHandle, button: MouseButton, x: i32, y: i32) {
        self.push(surface, Notification::MouseDown { button, x, y });
    }

    pub fn pointer_up(&mut self, surface: SurfaceHandle, button: MouseButton, x: i32, y: i32) {
        self.push(surface, Notification::MouseUp { button, x, y });
    }

    /// The pointer exits `surface`. Produces a leave notification only
    /// while tracking is armed, and disarms it.
    pub fn pointer_left(&mut self, surface: SurfaceHandle) -> bool {
        let armed = self
            .surfaces
            .get_mut(&surface)
            .is_some_and(|state| std::mem::take(&mut state.tracking_leave));
        if armed {
            self.push(surface, Notification::MouseLeave);
        }
        armed
    }

    /// Simulate the user closing `surface`.
    pub fn close(&mut self, surface: SurfaceHandle) {
        self.destroy_surface(surface);
    }

    fn set_focus(&mut self, surface: SurfaceHandle) {
        if self.focused == Some(surface) {
            return;
        }
        if let Some(previous) = self.focused.take() {
            self.push(previous, Notification::KillFocus);
        }
        self.focused = Some(surface);
        self.push(surface, Notification::SetFocus);
    }

    fn resized(&mut self, surface: SurfaceHandle, width: u32, height: u32) {
        self.messages.retain(|message| {
            message.surface != surface || !matches!(message.notification, Notification::Resize { .. })
        });
        self.push(surface, Notification::Resize { width, height });
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformHost for HeadlessHost {
    fn register_window_class(
        &mut self,
        class: &WindowClassConfig,
    ) -> Result<ClassAtom, PlatformError> {
        if let Some(reason) = self.fail_class.take() {
            return Err(PlatformError::ClassRegistration {
                class: class.name.clone(),
                reason,
            });
        }
        self.calls.push(HostCall::RegisterClass(class.name.clone()));
        let atom = ClassAtom(self.next_atom);
        self.next_atom += 1;
        Ok(atom)
    }

    fn create_surface(
        &mut self,
        _class: ClassAtom,
        title: &str,
        client_pixels: Option<(u32, u32)>,
    ) -> Result<SurfaceHandle, PlatformError> {
        if let Some(reason) = self.fail_surface.take() {
            return Err(PlatformError::SurfaceCreation { reason });
        }
        let surface = SurfaceHandle::from_raw(self.next_surface);
        self.next_surface += 1;
        let client_size = client_pixels.unwrap_or(DEFAULT_CLIENT_SIZE);
        let window_rect = PixelRect::new(0, 0, client_size.0 as i32, client_size.1 as i32);
        self.surfaces.insert(
            surface,
            HeadlessSurface {
                title: title.to_owned(),
                client_size,
                window_rect,
                visible: false,
                tracking_leave: false,
            },
        );
        self.calls.push(HostCall::CreateSurface(surface));
        Ok(surface)
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) {
        if self.surfaces.remove(&surface).is_none() {
            return;
        }
        self.calls.push(HostCall::DestroySurface(surface));
        self.messages.retain(|message| message.surface != surface);
        if self.focused == Some(surface) {
            self.focused = None;
            self.push(surface, Notification::KillFocus);
        }
        self.push(surface, Notification::Destroy);
    }

    fn show(&mut self, surface: SurfaceHandle) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.visible = true;
            self.calls.push(HostCall::Show(surface));
        }
    }

    fn hide(&mut self, surface: SurfaceHandle) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.visible = false;
            self.calls.push(HostCall::Hide(surface));
        }
    }

    fn request_repaint(&mut self, surface: SurfaceHandle) {
        if !self.surfaces.contains_key(&surface) {
            return;
        }
        self.calls.push(HostCall::Repaint(surface));
        let queued = self
            .messages
            .iter()
            .any(|message| message.surface == surface && message.notification == Notification::Paint);
        if !queued {
            self.push(surface, Notification::Paint);
        }
    }

    fn request_focus(&mut self, surface: SurfaceHandle) {
        if !self.surfaces.contains_key(&surface) {
            return;
        }
        self.calls.push(HostCall::Focus(surface));
        self.set_focus(surface);
    }

    fn track_mouse_leave(&mut self, surface: SurfaceHandle) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.tracking_leave = true;
            self.calls.push(HostCall::TrackMouseLeave(surface));
        }
    }

    fn client_size(&self, surface: SurfaceHandle) -> Option<(u32, u32)> {
        self.surfaces.get(&surface).map(|state| state.client_size)
    }

    fn set_client_size(&mut self, surface: SurfaceHandle, width: u32, height: u32) {
        let Some(state) = self.surfaces.get_mut(&surface) else {
            return;
        };
        state.client_size = (width, height);
        state.window_rect.width = width as i32;
        state.window_rect.height = height as i32;
        self.calls.push(HostCall::SetClientSize(surface, width, height));
        self.resized(surface, width, height);
    }

    fn window_rect(&self, surface: SurfaceHandle) -> Option<PixelRect> {
        self.surfaces.get(&surface).map(|state| state.window_rect)
    }

    fn set_window_rect(&mut self, surface: SurfaceHandle, rect: PixelRect) {
        let Some(state) = self.surfaces.get_mut(&surface) else {
            return;
        };
        state.window_rect = rect;
        // Headless surfaces have no frame: client area equals window rect.
        let client = (rect.width.max(0) as u32, rect.height.max(0) as u32);
        let resized = state.client_size != client;
        state.client_size = client;
        self.calls.push(HostCall::SetWindowRect(surface, rect));
        if resized {
            self.resized(surface, client.0, client.1);
        }
    }

    fn dpi(&self) -> Dpi {
        self.dpi
    }

    fn poll(&mut self, timeout: Option<Duration>) -> Poll {
        if let Some(message) = self.messages.pop_front() {
            return Poll::Message(message);
        }
        if let Some(code) = self.quit {
            return Poll::Quit(code);
        }
        match timeout {
            // Nothing can ever arrive: a real host would block forever.
            None => Poll::Quit(0),
            Some(timeout) => {
                std::thread::sleep(timeout);
                Poll::Idle
            }
        }
    }

    fn post_quit(&mut self, code: i32) {
        self.calls.push(HostCall::PostQuit(code));
        self.quit = Some(code);
    }
}
