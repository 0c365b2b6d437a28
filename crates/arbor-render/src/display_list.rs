#![forbid(unsafe_code)]

//! Deferred drawing commands.
//!
//! Draw-event subscribers cannot hold the live [`DrawContext`]; they append
//! commands to a [`DisplayList`] which the tree replays under the control's
//! transform.

use crate::backend::DrawContext;
use crate::color::Color;
use arbor_core::geometry::{Point, Rect};

/// One recorded drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        stroke_width: f32,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        stroke_width: f32,
    },
}

impl DrawCommand {
    pub fn apply(&self, cx: &mut dyn DrawContext) {
        match *self {
            DrawCommand::FillRect { rect, color } => cx.fill_rect(rect, color),
            DrawCommand::StrokeRect {
                rect,
                color,
                stroke_width,
            } => cx.stroke_rect(rect, color, stroke_width),
            DrawCommand::Line {
                from,
                to,
                color,
                stroke_width,
            } => cx.draw_line(from, to, color, stroke_width),
        }
    }
}

/// An ordered list of [`DrawCommand`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f32) {
        self.push(DrawCommand::StrokeRect {
            rect,
            color,
            stroke_width,
        });
    }

    pub fn draw_line(&mut self, from: Point, to: Point, color: Color, stroke_width: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            color,
            stroke_width,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Issue every command, in order, on `cx`.
    pub fn replay(&self, cx: &mut dyn DrawContext) {
        for command in &self.commands {
            command.apply(cx);
        }
    }
}
