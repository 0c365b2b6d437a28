#![forbid(unsafe_code)]

//! The application context and its message loop.
//!
//! [`Application`] owns everything a process needs to run windows: the
//! control tree, the surface registry, timers, the window class, the
//! platform host, and the render backend. Native notifications arrive
//! through [`PlatformHost::poll`], are routed to their window by surface,
//! and are followed by a pump of deferred work:
//!
//! 1. due timers are queued on the tree's task queue,
//! 2. the task queue runs until empty,
//! 3. host requests queued by the tree are flushed to the host.

use crate::config::{AppConfig, WindowOptions};
use crate::error::AppError;
use crate::host::{HostMessage, Notification, PixelRect, PlatformHost, Poll};
use crate::timer::{TimerManager, TimerTask};
use crate::window_class::WindowClass;
use arbor_core::{Dpi, Point, Rect, Size, SurfaceHandle};
use arbor_render::RenderBackend;
use arbor_ui::{ControlId, HostRequest, UiTree, Unregistered, WindowRegistry};
use std::time::{Duration, Instant};

pub struct Application<H: PlatformHost, B: RenderBackend> {
    config: AppConfig,
    host: H,
    backend: B,
    tree: UiTree,
    registry: WindowRegistry,
    timers: TimerManager<UiTree>,
    window_class: WindowClass,
    exit_code: Option<i32>,
}

impl<H: PlatformHost, B: RenderBackend> Application<H, B> {
    #[must_use]
    pub fn new(host: H, backend: B) -> Self {
        Self::with_config(AppConfig::default(), host, backend)
    }

    #[must_use]
    pub fn with_config(config: AppConfig, host: H, backend: B) -> Self {
        let window_class = WindowClass::new(config.window_class.clone());
        Self {
            config,
            host,
            backend,
            tree: UiTree::new(),
            registry: WindowRegistry::new(),
            timers: TimerManager::new(),
            window_class,
            exit_code: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn window_class(&self) -> &WindowClass {
        &self.window_class
    }

    /// Exit code once [`Self::quit`] was called or the last window closed.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    // ------------------------------------------------------------------
    // Windows
    // ------------------------------------------------------------------

    /// Create a native surface and the window root bound to it.
    ///
    /// Registers the window class on first use. If the render target cannot
    /// be created the surface is destroyed again.
    pub fn create_window(&mut self, options: WindowOptions) -> Result<ControlId, AppError> {
        let atom = self.window_class.ensure_registered(&mut self.host)?;
        let dpi = self.host.dpi();
        let requested = options.client_size.map(|size| to_pixels(dpi, size));
        let surface = self.host.create_surface(atom, &options.title, requested)?;

        let mut target = match self.backend.create_render_target(surface) {
            Ok(target) => target,
            Err(err) => {
                self.host.destroy_surface(surface);
                return Err(err.into());
            }
        };
        let pixels = self
            .host
            .client_size(surface)
            .or(requested)
            .unwrap_or((0, 0));
        if let Err(err) = target.resize_buffer(pixels.0, pixels.1) {
            self.host.destroy_surface(surface);
            return Err(err.into());
        }

        let window = self
            .tree
            .create_window(surface, to_logical(dpi, pixels), target);
        self.tree.set_background(window, self.config.background)?;
        self.registry.register(surface, window)?;
        if options.visible {
            self.host.show(surface);
        }
        arbor_core::debug!(window = ?window, %surface, title = %options.title, "application window created");
        Ok(window)
    }

    fn live_surface(&self, window: ControlId) -> Option<SurfaceHandle> {
        self.tree.surface(window).ok().flatten()
    }

    /// Ask the host to destroy the window's surface. The window itself is
    /// freed when the host reports the destruction.
    pub fn close(&mut self, window: ControlId) {
        if let Some(surface) = self.live_surface(window) {
            self.host.destroy_surface(surface);
        }
    }

    pub fn show(&mut self, window: ControlId) {
        if let Some(surface) = self.live_surface(window) {
            self.host.show(surface);
        }
    }

    pub fn hide(&mut self, window: ControlId) {
        if let Some(surface) = self.live_surface(window) {
            self.host.hide(surface);
        }
    }

    pub fn repaint(&mut self, window: ControlId) {
        if let Some(surface) = self.live_surface(window) {
            self.host.request_repaint(surface);
        }
    }

    pub fn is_window_valid(&self, window: ControlId) -> bool {
        self.tree.is_window_valid(window)
    }

    /// Client area in logical units.
    pub fn client_size(&self, window: ControlId) -> Option<Size> {
        let surface = self.live_surface(window)?;
        let pixels = self.host.client_size(surface)?;
        Some(to_logical(self.host.dpi(), pixels))
    }

    pub fn set_client_size(&mut self, window: ControlId, size: Size) {
        if let Some(surface) = self.live_surface(window) {
            let (width, height) = to_pixels(self.host.dpi(), size);
            self.host.set_client_size(surface, width, height);
        }
    }

    /// Outer window rectangle in logical units.
    pub fn window_rect(&self, window: ControlId) -> Option<Rect> {
        let surface = self.live_surface(window)?;
        let rect = self.host.window_rect(surface)?;
        let dpi = self.host.dpi();
        Some(Rect::new(
            dpi.pixel_to_dip_x(rect.left),
            dpi.pixel_to_dip_y(rect.top),
            dpi.pixel_to_dip_x(rect.width),
            dpi.pixel_to_dip_y(rect.height),
        ))
    }

    pub fn set_window_rect(&mut self, window: ControlId, rect: Rect) {
        if let Some(surface) = self.live_surface(window) {
            let dpi = self.host.dpi();
            let pixels = PixelRect::new(
                dpi.dip_to_pixel_x(rect.left),
                dpi.dip_to_pixel_y(rect.top),
                dpi.dip_to_pixel_x(rect.width),
                dpi.dip_to_pixel_y(rect.height),
            );
            self.host.set_window_rect(surface, pixels);
        }
    }

    // ------------------------------------------------------------------
    // Deferred work
    // ------------------------------------------------------------------

    /// Run `action` on the next pump, after already queued tasks.
    pub fn invoke_later(&self, action: impl FnOnce(&mut UiTree) + 'static) {
        self.tree.invoke_later(action);
    }

    pub fn set_timeout(
        &mut self,
        delay: Duration,
        action: impl FnMut(&mut UiTree) + 'static,
    ) -> TimerTask {
        self.timers.set_timeout(delay, action)
    }

    pub fn set_interval(
        &mut self,
        period: Duration,
        action: impl FnMut(&mut UiTree) + 'static,
    ) -> TimerTask {
        self.timers.set_interval(period, action)
    }

    /// Queue due timers, run the task queue until empty, and flush host
    /// requests. Returns the number of tasks run.
    pub fn pump(&mut self) -> usize {
        self.timers.fire_due(Instant::now(), &self.tree.scheduler());
        let ran = self.tree.run_pending_tasks();
        self.flush_host_requests();
        ran
    }

    fn flush_host_requests(&mut self) {
        for request in self.tree.take_host_requests() {
            let surface = request.surface();
            let live = self
                .registry
                .resolve(surface)
                .is_some_and(|window| self.tree.is_window_valid(window));
            if !live {
                arbor_core::warn!(?request, "dropping request for invalid surface");
                continue;
            }
            match request {
                HostRequest::TrackMouseLeave(surface) => self.host.track_mouse_leave(surface),
                HostRequest::Focus(surface) => self.host.request_focus(surface),
                HostRequest::Repaint(surface) => self.host.request_repaint(surface),
            }
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Route one native notification to its window, then pump.
    ///
    /// Messages for surfaces that are not registered are ignored.
    pub fn dispatch(&mut self, message: HostMessage) -> Result<(), AppError> {
        let HostMessage {
            surface,
            notification,
        } = message;
        let Some(window) = self.registry.resolve(surface) else {
            arbor_core::trace!(%surface, ?notification, "message for unknown surface ignored");
            return Ok(());
        };
        let span = arbor_core::trace_span!("dispatch", %surface, ?notification);
        let _guard = span.enter();
        let dpi = self.host.dpi();
        let point = |x: i32, y: i32| Point::new(dpi.pixel_to_dip_x(x), dpi.pixel_to_dip_y(y));

        match notification {
            Notification::Paint => self.tree.paint(window, &mut self.backend)?,
            Notification::Resize { width, height } => {
                let client = to_logical(dpi, (width, height));
                self.tree.handle_resize(window, (width, height), client)?;
            }
            Notification::Destroy => self.destroy(surface, window)?,
            Notification::SetFocus => self.tree.handle_set_focus(window)?,
            Notification::KillFocus => self.tree.handle_kill_focus(window)?,
            Notification::MouseMove { x, y } => self.tree.handle_mouse_move(window, point(x, y))?,
            Notification::MouseLeave => self.tree.handle_mouse_leave(window)?,
            Notification::MouseDown { button, x, y } => {
                self.tree.handle_mouse_down(window, button, point(x, y))?;
            }
            Notification::MouseUp { button, x, y } => {
                self.tree.handle_mouse_up(window, button, point(x, y))?;
            }
        }
        self.pump();
        Ok(())
    }

    fn destroy(&mut self, surface: SurfaceHandle, window: ControlId) -> Result<(), AppError> {
        self.tree.destroy_window(window)?;
        if let Unregistered::Last = self.registry.unregister(surface)? {
            arbor_core::debug!("last window destroyed");
            self.quit(self.config.quit_code);
        }
        Ok(())
    }

    /// End the message loop with `code`.
    pub fn quit(&mut self, code: i32) {
        if self.exit_code.is_none() {
            self.exit_code = Some(code);
            self.host.post_quit(code);
        }
    }

    /// Run the message loop until [`Self::quit`] is called, the last window
    /// is destroyed, or the host reports quit.
    ///
    /// A failed dispatch is fatal: the error is logged and returned.
    pub fn run(&mut self) -> Result<i32, AppError> {
        arbor_core::info!(windows = self.registry.len(), "message loop started");
        loop {
            self.pump();
            if let Some(code) = self.exit_code {
                arbor_core::info!(code, "message loop finished");
                return Ok(code);
            }
            let timeout = if self.tree.has_pending_tasks() {
                Some(Duration::ZERO)
            } else {
                self.timers
                    .next_deadline()
                    .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            };
            match self.host.poll(timeout) {
                Poll::Message(message) => {
                    if let Err(err) = self.dispatch(message) {
                        arbor_core::error!(error = %err, "dispatch failed, stopping message loop");
                        return Err(err);
                    }
                }
                Poll::Idle => {}
                Poll::Quit(code) => {
                    let code = self.exit_code.unwrap_or(code);
                    arbor_core::info!(code, "host quit");
                    return Ok(code);
                }
            }
        }
    }
}

fn to_pixels(dpi: Dpi, size: Size) -> (u32, u32) {
    (
        dpi.dip_to_pixel_x(size.width).max(0) as u32,
        dpi.dip_to_pixel_y(size.height).max(0) as u32,
    )
}

fn to_logical(dpi: Dpi, pixels: (u32, u32)) -> Size {
    Size::new(
        dpi.pixel_to_dip_x(pixels.0 as i32),
        dpi.pixel_to_dip_y(pixels.1 as i32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::headless::{HeadlessHost, HostCall};
    use arbor_render::RenderError;
    use arbor_render::headless::{RecordedOp, RecordingBackend};

    fn app() -> Application<HeadlessHost, RecordingBackend> {
        Application::new(HeadlessHost::new(), RecordingBackend::new())
    }

    #[test]
    fn create_window_registers_class_once() {
        let mut app = app();
        app.create_window(WindowOptions::new("one")).unwrap();
        app.create_window(WindowOptions::new("two")).unwrap();
        let registrations = app
            .host()
            .calls()
            .iter()
            .filter(|call| matches!(call, HostCall::RegisterClass(_)))
            .count();
        assert_eq!(registrations, 1);
        assert_eq!(app.registry().len(), 2);
    }

    #[test]
    fn window_takes_host_client_size() {
        let mut app = app();
        let window = app.create_window(WindowOptions::new("main")).unwrap();
        assert_eq!(app.tree().size(window).unwrap(), Size::new(640.0, 480.0));
        assert_eq!(app.client_size(window), Some(Size::new(640.0, 480.0)));
        let resized = app
            .backend()
            .log()
            .ops()
            .iter()
            .any(|op| matches!(op, RecordedOp::Resize(_, 640, 480)));
        assert!(resized);
    }

    #[test]
    fn logical_sizes_scale_with_dpi() {
        let mut app = Application::new(
            HeadlessHost::with_dpi(Dpi::uniform(192.0)),
            RecordingBackend::new(),
        );
        let window = app
            .create_window(WindowOptions::new("hidpi").with_client_size(Size::new(100.0, 50.0)))
            .unwrap();
        let surface = app.tree().surface(window).unwrap().unwrap();
        assert_eq!(app.host().client_size(surface), Some((200, 100)));
        assert_eq!(app.tree().size(window).unwrap(), Size::new(100.0, 50.0));
    }

    #[test]
    fn hidden_window_is_not_shown() {
        let mut app = app();
        let window = app.create_window(WindowOptions::new("bg").hidden()).unwrap();
        let surface = app.tree().surface(window).unwrap().unwrap();
        assert!(!app.host().surface(surface).unwrap().visible);
        app.show(window);
        assert!(app.host().surface(surface).unwrap().visible);
        app.hide(window);
        assert!(!app.host().surface(surface).unwrap().visible);
    }

    #[test]
    fn surface_failure_propagates() {
        let mut app = app();
        app.host_mut().fail_next_surface("out of handles");
        let err = app.create_window(WindowOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Platform(PlatformError::SurfaceCreation { .. })
        ));
        assert!(app.registry().is_empty());
        assert!(app.tree().is_empty());
    }

    #[test]
    fn unknown_surface_is_ignored() {
        let mut app = app();
        let message = HostMessage::new(SurfaceHandle::from_raw(0xdead), Notification::Paint);
        assert!(app.dispatch(message).is_ok());
    }

    #[test]
    fn requests_for_dead_surfaces_are_dropped() {
        let mut app = app();
        let window = app.create_window(WindowOptions::new("main")).unwrap();
        app.tree_mut().request_repaint(window);
        app.tree_mut().invalidate_surface(window).unwrap();
        app.host_mut().clear_calls();
        app.pump();
        assert!(app.host().calls().is_empty());
    }

    #[test]
    fn quit_is_idempotent() {
        let mut app = app();
        app.quit(2);
        app.quit(5);
        assert_eq!(app.exit_code(), Some(2));
        assert_eq!(app.run(), Ok(2));
    }

    #[test]
    fn render_target_failure_surfaces_as_render_error() {
        struct NoTargets;
        impl RenderBackend for NoTargets {
            fn create_render_target(
                &mut self,
                surface: SurfaceHandle,
            ) -> Result<Box<dyn arbor_render::RenderTarget>, RenderError> {
                Err(RenderError::TargetCreation {
                    surface,
                    reason: "no device".to_owned(),
                })
            }

            fn bind_target(&mut self, _target: &dyn arbor_render::RenderTarget) {}

            fn context(&mut self) -> &mut dyn arbor_render::DrawContext {
                unreachable!("no target was ever created")
            }
        }

        let mut app = Application::new(HeadlessHost::new(), NoTargets);
        let err = app.create_window(WindowOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
        assert_eq!(app.host().surface_count(), 0);
    }
}
