#![forbid(unsafe_code)]

//! Headless render backend that records every call.
//!
//! All targets created by one [`RecordingBackend`] append to a shared
//! [`RenderLog`], so a test can assert on the full sequence of binds, frames,
//! primitives and presents across windows.

use crate::backend::{DrawContext, RenderBackend, RenderTarget, TargetId};
use crate::color::Color;
use crate::error::{DrawError, RenderError};
use crate::transform::Transform;
use arbor_core::SurfaceHandle;
use arbor_core::geometry::{Point, Rect};
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedOp {
    CreateTarget(TargetId, SurfaceHandle),
    Bind(TargetId),
    BeginFrame,
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
        transform: Transform,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        stroke_width: f32,
        transform: Transform,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        transform: Transform,
    },
    EndFrame,
    Present(TargetId),
    Resize(TargetId, u32, u32),
}

impl RecordedOp {
    /// Device-space rectangle of a fill or stroke, assuming a translation-only
    /// transform.
    pub fn device_rect(&self) -> Option<Rect> {
        match self {
            RecordedOp::FillRect {
                rect, transform, ..
            }
            | RecordedOp::StrokeRect {
                rect, transform, ..
            } => Some(Rect::from_origin_size(
                transform.apply(rect.lefttop()),
                rect.size(),
            )),
            _ => None,
        }
    }
}

/// Shared, clonable log of [`RecordedOp`]s.
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    ops: Rc<RefCell<Vec<RecordedOp>>>,
}

impl RenderLog {
    fn push(&self, op: RecordedOp) {
        self.ops.borrow_mut().push(op);
    }

    /// Snapshot of every op recorded so far.
    pub fn ops(&self) -> Vec<RecordedOp> {
        self.ops.borrow().clone()
    }

    /// Device rectangles of every fill, in draw order.
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, RecordedOp::FillRect { .. }))
            .filter_map(RecordedOp::device_rect)
            .collect()
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }
}

/// Drawing context that records instead of rasterising.
#[derive(Debug)]
pub struct RecordingContext {
    log: RenderLog,
    transform: Transform,
    in_frame: bool,
    fail_next_frame: Option<DrawError>,
}

impl DrawContext for RecordingContext {
    fn begin_frame(&mut self) {
        self.in_frame = true;
        self.transform = Transform::IDENTITY;
        self.log.push(RecordedOp::BeginFrame);
    }

    fn clear(&mut self, color: Color) {
        self.log.push(RecordedOp::Clear(color));
    }

    fn end_frame(&mut self) -> Result<(), DrawError> {
        self.in_frame = false;
        self.log.push(RecordedOp::EndFrame);
        match self.fail_next_frame.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.log.push(RecordedOp::FillRect {
            rect,
            color,
            transform: self.transform,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f32) {
        self.log.push(RecordedOp::StrokeRect {
            rect,
            color,
            stroke_width,
            transform: self.transform,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, _stroke_width: f32) {
        self.log.push(RecordedOp::Line {
            from,
            to,
            color,
            transform: self.transform,
        });
    }
}

/// Render target backed by nothing but a size.
#[derive(Debug)]
pub struct RecordingTarget {
    id: TargetId,
    surface: SurfaceHandle,
    size: (u32, u32),
    log: RenderLog,
}

impl RenderTarget for RecordingTarget {
    fn id(&self) -> TargetId {
        self.id
    }

    fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn resize_buffer(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.size = (width, height);
        self.log.push(RecordedOp::Resize(self.id, width, height));
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.log.push(RecordedOp::Present(self.id));
        Ok(())
    }
}

/// Backend producing [`RecordingTarget`]s and a [`RecordingContext`].
#[derive(Debug)]
pub struct RecordingBackend {
    next_target: u64,
    bound: Option<TargetId>,
    context: RecordingContext,
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        let log = RenderLog::default();
        Self {
            next_target: 1,
            bound: None,
            context: RecordingContext {
                log,
                transform: Transform::IDENTITY,
                in_frame: false,
                fail_next_frame: None,
            },
        }
    }

    /// Handle to the shared op log.
    pub fn log(&self) -> RenderLog {
        self.context.log.clone()
    }

    /// Target bound by the most recent [`RenderBackend::bind_target`].
    pub fn bound_target(&self) -> Option<TargetId> {
        self.bound
    }

    /// Whether a frame has begun and not yet ended.
    pub fn in_frame(&self) -> bool {
        self.context.in_frame
    }

    /// Make the next `end_frame` fail with `err`.
    pub fn fail_next_frame(&mut self, err: DrawError) {
        self.context.fail_next_frame = Some(err);
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for RecordingBackend {
    fn create_render_target(
        &mut self,
        surface: SurfaceHandle,
    ) -> Result<Box<dyn RenderTarget>, RenderError> {
        let id = TargetId(self.next_target);
        self.next_target += 1;
        self.context.log.push(RecordedOp::CreateTarget(id, surface));
        arbor_core::trace!(render_target = ?id, %surface, "recording target created");
        Ok(Box::new(RecordingTarget {
            id,
            surface,
            size: (0, 0),
            log: self.context.log.clone(),
        }))
    }

    fn bind_target(&mut self, target: &dyn RenderTarget) {
        self.bound = Some(target.id());
        self.context.log.push(RecordedOp::Bind(target.id()));
    }

    fn context(&mut self) -> &mut dyn DrawContext {
        &mut self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_share_the_backend_log() {
        let mut backend = RecordingBackend::new();
        let log = backend.log();
        let mut a = backend
            .create_render_target(SurfaceHandle::from_raw(1))
            .unwrap();
        let b = backend
            .create_render_target(SurfaceHandle::from_raw(2))
            .unwrap();
        assert_ne!(a.id(), b.id());
        a.resize_buffer(10, 20).unwrap();
        assert_eq!(a.buffer_size(), (10, 20));
        assert_eq!(
            log.ops().last(),
            Some(&RecordedOp::Resize(a.id(), 10, 20))
        );
    }

    #[test]
    fn failing_frame_reports_once() {
        let mut backend = RecordingBackend::new();
        backend.fail_next_frame(DrawError::DeviceLost);
        let cx = backend.context();
        cx.begin_frame();
        assert_eq!(cx.end_frame(), Err(DrawError::DeviceLost));
        cx.begin_frame();
        assert_eq!(cx.end_frame(), Ok(()));
    }

    #[test]
    fn fills_capture_transform() {
        let mut backend = RecordingBackend::new();
        let log = backend.log();
        let cx = backend.context();
        cx.begin_frame();
        cx.set_transform(Transform::translation(5.0, 6.0));
        cx.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), Color::BLACK);
        assert_eq!(log.filled_rects(), vec![Rect::new(6.0, 7.0, 2.0, 2.0)]);
    }
}
