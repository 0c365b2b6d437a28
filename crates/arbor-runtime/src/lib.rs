#![forbid(unsafe_code)]

//! Runtime for the Arbor control tree.
//!
//! The tree in `arbor-ui` never calls the platform. This crate supplies
//! the pieces around it:
//!
//! - [`PlatformHost`]: the native windowing contract (surfaces, message
//!   polling, best-effort requests), with [`HeadlessHost`] as an in-memory
//!   implementation.
//! - [`WindowClass`]: class registration performed once per application.
//! - [`TimerManager`]: timeouts and intervals fired as deferred tasks.
//! - [`Application`]: owns the tree, the registry, the timers, the host, and
//!   the render backend, and runs the message loop.
//!
//! # Example
//!
//! ```
//! use arbor_render::headless::RecordingBackend;
//! use arbor_runtime::{Application, HeadlessHost, WindowOptions};
//!
//! let mut app = Application::new(HeadlessHost::new(), RecordingBackend::new());
//! let window = app.create_window(WindowOptions::new("hello")).unwrap();
//! app.close(window);
//! // Destroying the last window ends the loop.
//! assert_eq!(app.run().unwrap(), 0);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod headless;
pub mod host;
pub mod timer;
pub mod window_class;

pub use app::Application;
pub use config::{AppConfig, ClassStyle, StockCursor, StockIcon, WindowClassConfig, WindowOptions};
pub use error::{AppError, PlatformError};
pub use headless::{HeadlessHost, HeadlessSurface, HostCall};
pub use host::{ClassAtom, HostMessage, Notification, PixelRect, PlatformHost, Poll};
pub use timer::{TimerId, TimerManager, TimerTask};
pub use window_class::WindowClass;
