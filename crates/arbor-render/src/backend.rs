#![forbid(unsafe_code)]

//! Backend traits consumed by window painting.

use crate::color::Color;
use crate::error::{DrawError, RenderError};
use crate::transform::Transform;
use arbor_core::SurfaceHandle;
use arbor_core::geometry::{Point, Rect};

/// Identifies a render target within its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Immediate-mode drawing surface with a current transform.
///
/// Geometry passed to the primitives is in the space of the current
/// transform.
pub trait DrawContext {
    fn begin_frame(&mut self);

    fn clear(&mut self, color: Color);

    /// Finish the frame. A failure here is fatal for the paint in progress.
    fn end_frame(&mut self) -> Result<(), DrawError>;

    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f32);

    fn draw_line(&mut self, from: Point, to: Point, color: Color, stroke_width: f32);
}

/// A backbuffer bound to one native surface.
pub trait RenderTarget {
    fn id(&self) -> TargetId;

    fn surface(&self) -> SurfaceHandle;

    /// Current backbuffer size in pixels.
    fn buffer_size(&self) -> (u32, u32);

    /// Reallocate the backbuffer to `width` x `height` pixels.
    fn resize_buffer(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Show the finished frame on the surface.
    fn present(&mut self) -> Result<(), RenderError>;
}

/// Device-level rendering collaborator shared by every window.
pub trait RenderBackend {
    fn create_render_target(
        &mut self,
        surface: SurfaceHandle,
    ) -> Result<Box<dyn RenderTarget>, RenderError>;

    /// Make `target` the destination of subsequent drawing on [`Self::context`].
    fn bind_target(&mut self, target: &dyn RenderTarget);

    fn context(&mut self) -> &mut dyn DrawContext;
}
