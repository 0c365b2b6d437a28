#![forbid(unsafe_code)]

//! Drawing the tree into a render backend.
//!
//! Nested positions accumulate through the context transform: each control
//! pre-translates the caller's transform by its relative position, draws,
//! recurses into its children, and restores the caller's transform. The
//! absolute-position cache plays no part here.

use crate::args::DrawEventArgs;
use crate::error::{TreeError, UiError};
use crate::tree::{ControlId, UiTree};
use arbor_render::{Color, DrawContext, RenderBackend, RenderError, RenderTarget};

impl UiTree {
    /// Draw `id` and its subtree with `dc`'s current transform as the
    /// parent's space.
    pub fn draw(&mut self, id: ControlId, dc: &mut dyn DrawContext) -> Result<(), TreeError> {
        let position = self.node(id)?.position;
        let saved = dc.transform();
        dc.set_transform(saved.pre_translate(position));

        self.with_behavior(id, |behavior, cx| behavior.on_draw(cx, dc));

        if let Some(node) = self.nodes.get_mut(id) {
            if !node.events.draw.is_empty() {
                let mut args = DrawEventArgs::new(id);
                node.events.draw.raise(&mut args);
                args.display_list.replay(dc);
            }
        }

        // Children may have been removed by a draw hook.
        let children = self.get_children(id).unwrap_or_default();
        for child in children {
            self.draw(child, dc)?;
        }

        dc.set_transform(saved);
        Ok(())
    }

    /// Paint one frame of `window`: bind its target, clear, draw the tree,
    /// end the frame, present.
    ///
    /// A failed frame is returned as [`UiError::Render`] and is fatal for
    /// the window. Painting a destroyed window does nothing.
    pub fn paint(
        &mut self,
        window: ControlId,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), UiError> {
        let span = arbor_core::debug_span!("paint", window = ?window);
        let _guard = span.enter();
        let state = self.window_state_mut(window)?;
        if state.surface.is_none() {
            return Ok(());
        }
        let background = state.background;
        let Some(mut target) = state.render_target.take() else {
            return Ok(());
        };

        let result = self.paint_frame(window, background, target.as_mut(), backend);

        if let Ok(state) = self.window_state_mut(window) {
            if state.surface.is_some() {
                state.render_target = Some(target);
            }
        }
        if let Err(err) = &result {
            arbor_core::error!(window = ?window, error = %err, "paint failed");
        }
        result
    }

    fn paint_frame(
        &mut self,
        window: ControlId,
        background: Color,
        target: &mut dyn RenderTarget,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), UiError> {
        backend.bind_target(&*target);
        let dc = backend.context();
        dc.begin_frame();
        dc.clear(background);
        let drawn = self.draw(window, dc);
        let ended = dc.end_frame();
        drawn?;
        ended.map_err(RenderError::from)?;
        target.present()?;
        arbor_core::trace!(window = ?window, "frame presented");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::control::{ControlCx, Drawable, InputTarget, Layoutable};
    use crate::error::UiError;
    use crate::testing::window_on;
    use crate::tree::UiTree;
    use arbor_core::{Point, Rect, Size};
    use arbor_render::headless::{RecordedOp, RecordingBackend};
    use arbor_render::{Color, DrawContext, DrawError, RenderError};

    struct Swatch(Color);

    impl Layoutable for Swatch {}
    impl InputTarget for Swatch {}
    impl Drawable for Swatch {
        fn on_draw(&mut self, cx: &mut ControlCx<'_>, dc: &mut dyn DrawContext) {
            let size = cx.size();
            dc.fill_rect(Rect::from_origin_size(Point::ZERO, size), self.0);
        }
    }

    #[test]
    fn nested_controls_draw_at_composed_offsets() {
        let mut backend = RecordingBackend::new();
        let mut tree = UiTree::new();
        let window = window_on(&mut tree, &mut backend);
        let outer = tree.create(Swatch(Color::BLACK));
        let inner = tree.create(Swatch(Color::WHITE));
        tree.set_position(outer, Point::new(10.0, 10.0)).unwrap();
        tree.set_size(outer, Size::new(50.0, 50.0)).unwrap();
        tree.set_position(inner, Point::new(5.0, 5.0)).unwrap();
        tree.set_size(inner, Size::new(10.0, 10.0)).unwrap();
        tree.add_child(outer, inner).unwrap();
        tree.add_child(window, outer).unwrap();

        let log = backend.log();
        log.clear();
        tree.paint(window, &mut backend).unwrap();

        let ops = log.ops();
        assert!(matches!(ops.first(), Some(RecordedOp::Bind(_))));
        assert!(matches!(ops.last(), Some(RecordedOp::Present(_))));
        let device: Vec<Rect> = ops.iter().filter_map(RecordedOp::device_rect).collect();
        assert_eq!(
            device,
            vec![
                Rect::new(10.0, 10.0, 50.0, 50.0),
                Rect::new(15.0, 15.0, 10.0, 10.0),
            ]
        );
    }

    #[test]
    fn draw_channel_is_replayed_after_hook() {
        let mut backend = RecordingBackend::new();
        let mut tree = UiTree::new();
        let window = window_on(&mut tree, &mut backend);
        let swatch = tree.create(Swatch(Color::BLACK));
        tree.set_size(swatch, Size::new(4.0, 4.0)).unwrap();
        tree.set_position(swatch, Point::new(1.0, 1.0)).unwrap();
        tree.add_child(window, swatch).unwrap();
        tree.events_mut(swatch)
            .unwrap()
            .draw
            .add_handler(|args| args.display_list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE));

        let log = backend.log();
        log.clear();
        tree.paint(window, &mut backend).unwrap();
        assert_eq!(
            log.filled_rects(),
            vec![Rect::new(1.0, 1.0, 4.0, 4.0), Rect::new(1.0, 1.0, 1.0, 1.0)]
        );
    }

    #[test]
    fn failed_frame_is_reported() {
        let mut backend = RecordingBackend::new();
        let mut tree = UiTree::new();
        let window = window_on(&mut tree, &mut backend);
        backend.fail_next_frame(DrawError::DeviceLost);
        let err = tree.paint(window, &mut backend).unwrap_err();
        assert_eq!(err, UiError::Render(RenderError::Draw(DrawError::DeviceLost)));
        assert!(!backend.in_frame());
        // The target survives for the next attempt.
        tree.paint(window, &mut backend).unwrap();
    }
}
