#![forbid(unsafe_code)]

//! Core: geometry, typed event channels, surface handles, and the deferred
//! task queue shared by every layer of the control tree.

pub mod dpi;
pub mod event;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod surface;
pub mod task_queue;

pub use dpi::Dpi;
pub use event::{Event, HandlerId};
pub use geometry::{Point, Rect, Size, Thickness};
pub use input::MouseButton;
pub use surface::SurfaceHandle;
pub use task_queue::{Task, TaskQueue};

/// Early-exit signal for visitors walking children or descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowControl {
    /// Keep visiting.
    #[default]
    Continue,
    /// Stop visiting the remaining siblings.
    Break,
}

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
