#![forbid(unsafe_code)]

//! Arbor public facade crate.
//!
//! Re-exports the types most applications touch from the internal crates
//! and offers a prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use arbor_core::{
    Dpi, Event, FlowControl, HandlerId, MouseButton, Point, Rect, Size, SurfaceHandle,
    TaskQueue, Thickness,
};

// --- Layout re-exports -----------------------------------------------------

pub use arbor_layout::{LayoutParams, MeasureConstraint, MeasureMode, SizePolicy};

// --- Render re-exports -----------------------------------------------------

pub use arbor_render::{Color, DrawContext, DrawError, RenderBackend, RenderError, RenderTarget};

// --- Tree re-exports -------------------------------------------------------

pub use arbor_ui::{
    Control, ControlCx, ControlEvents, ControlId, ControlView, Drawable, InputTarget, Layoutable,
    MouseButtonEventArgs, MouseEventArgs, Panel, TreeError, UiError, UiEventArgs, UiTree,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use arbor_runtime::{
    AppConfig, AppError, Application, HeadlessHost, PlatformHost, TimerTask, WindowOptions,
};

/// Standard result type for Arbor applications.
#[cfg(feature = "runtime")]
pub type Result<T> = std::result::Result<T, AppError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Color, Control, ControlCx, ControlId, DrawContext, Drawable, InputTarget, Layoutable,
        MouseButton, Point, Rect, Size, UiTree,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{AppError, Application, Result, WindowOptions};

    pub use crate::{core, layout, render, ui};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use arbor_core as core;
pub use arbor_layout as layout;
pub use arbor_render as render;
#[cfg(feature = "runtime")]
pub use arbor_runtime as runtime;
pub use arbor_ui as ui;
