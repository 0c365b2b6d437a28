#![forbid(unsafe_code)]

//! The retained control tree.
//!
//! [`UiTree`] owns every control of every window in one arena. Controls are
//! addressed by [`ControlId`]; parent and window links are plain ids, so
//! the tree owns children exclusively and back-references never keep
//! anything alive.
//!
//! # Role in Arbor
//! - **Structure**: create, attach, detach, and dispose controls
//!   ([`UiTree::add_child`], [`UiTree::remove_child`], [`UiTree::dispose`]).
//! - **Layout**: measure/arrange through [`Layoutable`] hooks.
//! - **Input**: hit testing, bubbling mouse dispatch with enter/leave at the
//!   lowest common ancestor, and focus.
//! - **Paint**: drawing through the [`arbor_render`] contracts.
//!
//! The tree never talks to the platform directly. Native calls it needs
//! are queued as [`HostRequest`]s, and deferred work (position-cache
//! drains, [`UiTree::invoke_later`]) runs on the tree's task queue. The
//! runtime flushes both.
//!
//! # Example
//!
//! ```
//! use arbor_core::{Point, Size, SurfaceHandle};
//! use arbor_render::RenderBackend;
//! use arbor_render::headless::RecordingBackend;
//! use arbor_ui::{Panel, UiTree};
//!
//! let mut backend = RecordingBackend::new();
//! let surface = SurfaceHandle::from_raw(1);
//! let target = backend.create_render_target(surface).unwrap();
//!
//! let mut tree = UiTree::new();
//! let window = tree.create_window(surface, Size::new(100.0, 100.0), target);
//! let panel = tree.create(Panel);
//! tree.set_position(panel, Point::new(10.0, 10.0)).unwrap();
//! tree.set_size(panel, Size::new(50.0, 50.0)).unwrap();
//! tree.add_child(window, panel).unwrap();
//!
//! // Absolute positions refresh on the next drain.
//! tree.run_pending_tasks();
//! assert_eq!(tree.hit_test(window, Point::new(20.0, 20.0)).unwrap(), panel);
//! assert_eq!(tree.hit_test(window, Point::new(80.0, 80.0)).unwrap(), window);
//! ```

pub mod args;
pub mod control;
pub mod error;
mod input;
mod layout;
pub mod node;
mod paint;
mod position_cache;
pub mod registry;
pub mod tree;
pub mod window;

pub use args::{
    DrawEventArgs, MouseButtonEventArgs, MouseEventArgs, PositionChangedEventArgs,
    SizeChangedEventArgs, UiEventArgs,
};
pub use control::{Control, ControlCx, ControlView, Drawable, InputTarget, Layoutable, Panel, base};
pub use error::{TreeError, UiError};
pub use node::ControlEvents;
pub use registry::{Unregistered, WindowRegistry};
pub use tree::{ControlId, UiTree};
pub use window::HostRequest;
