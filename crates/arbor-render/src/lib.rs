#![forbid(unsafe_code)]

//! Render contracts: what the control tree needs from a drawing backend.
//!
//! The tree never rasterises anything itself. A window owns one
//! [`RenderTarget`] created by a [`RenderBackend`]; painting binds that target,
//! brackets the frame with [`DrawContext::begin_frame`] /
//! [`DrawContext::end_frame`], and presents it. Nested control positions are
//! applied by composing [`Transform`]s, not by moving coordinates.
//!
//! [`headless`] provides a backend that records every call, used by tests and
//! by hosts without a GPU.

pub mod backend;
pub mod color;
pub mod display_list;
pub mod error;
pub mod headless;
pub mod transform;

pub use backend::{DrawContext, RenderBackend, RenderTarget, TargetId};
pub use color::Color;
pub use display_list::{DisplayList, DrawCommand};
pub use error::{DrawError, RenderError};
pub use transform::Transform;
