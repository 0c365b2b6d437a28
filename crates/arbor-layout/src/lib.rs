#![forbid(unsafe_code)]

//! Layout primitives for the two-pass measure/arrange protocol.
//!
//! - [`AxisConstraint`] - what a parent offers along one axis
//!   ([`MeasureMode::Exact`], [`MeasureMode::AtMost`], or [`MeasureMode::Unbounded`])
//! - [`MeasureConstraint`] - an axis constraint per dimension
//! - [`SizePolicy`] - how a control wants to be sized along one axis
//! - [`LayoutParams`] - per-control policies plus padding and margin
//!
//! The tree calls [`resolve_constraint`] on the way down (what a composite
//! control offers its children) and [`desired_size`] on the way back up (what
//! it reports to its own parent).
//!
//! # Example
//!
//! ```
//! use arbor_layout::{LayoutParams, MeasureConstraint, SizePolicy, desired_size, resolve_constraint};
//! use arbor_core::Size;
//!
//! let params = LayoutParams::new(SizePolicy::Exact(100.0), SizePolicy::Content);
//! let available = MeasureConstraint::exact(Size::new(60.0, 40.0));
//! let resolved = resolve_constraint(&params, available);
//! let desired = desired_size(&params, resolved, [Size::new(10.0, 25.0), Size::new(30.0, 5.0)]);
//!
//! // Exact widths clamp to the offered length; content heights take the tallest child.
//! assert_eq!(desired, Size::new(60.0, 25.0));
//! ```

mod params;

pub use arbor_core::geometry::{Point, Rect, Size, Thickness};
pub use params::{LayoutParams, SizePolicy};

/// How a parent constrains one axis of a child during measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeasureMode {
    /// The child gets exactly `length`.
    Exact,
    /// The child may use up to `length` and should shrink to fit.
    AtMost,
    /// The child may grow to its content.
    #[default]
    Unbounded,
}

/// Available length along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisConstraint {
    pub mode: MeasureMode,
    /// Ignored when `mode` is [`MeasureMode::Unbounded`].
    pub length: f32,
}

impl AxisConstraint {
    pub const UNBOUNDED: Self = Self {
        mode: MeasureMode::Unbounded,
        length: 0.0,
    };

    #[inline]
    pub const fn exact(length: f32) -> Self {
        Self {
            mode: MeasureMode::Exact,
            length,
        }
    }

    #[inline]
    pub const fn at_most(length: f32) -> Self {
        Self {
            mode: MeasureMode::AtMost,
            length,
        }
    }

    /// Whether the axis carries a usable length.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.mode != MeasureMode::Unbounded
    }

    /// Fit a content-driven length into this constraint.
    #[inline]
    pub fn fit(&self, content: f32) -> f32 {
        match self.mode {
            MeasureMode::Exact => self.length,
            MeasureMode::AtMost => content.min(self.length),
            MeasureMode::Unbounded => content,
        }
    }
}

/// Available size offered to a control during measure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureConstraint {
    pub width: AxisConstraint,
    pub height: AxisConstraint,
}

impl MeasureConstraint {
    #[inline]
    pub const fn new(width: AxisConstraint, height: AxisConstraint) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn exact(size: Size) -> Self {
        Self::new(
            AxisConstraint::exact(size.width),
            AxisConstraint::exact(size.height),
        )
    }

    #[inline]
    pub const fn at_most(size: Size) -> Self {
        Self::new(
            AxisConstraint::at_most(size.width),
            AxisConstraint::at_most(size.height),
        )
    }

    #[inline]
    pub const fn unbounded() -> Self {
        Self::new(AxisConstraint::UNBOUNDED, AxisConstraint::UNBOUNDED)
    }

    /// Fit a content size into both axes.
    #[inline]
    pub fn fit(&self, content: Size) -> Size {
        Size::new(self.width.fit(content.width), self.height.fit(content.height))
    }
}

/// Resolve the constraint a composite control hands to its children.
pub fn resolve_constraint(params: &LayoutParams, available: MeasureConstraint) -> MeasureConstraint {
    MeasureConstraint::new(
        params.width.resolve(available.width),
        params.height.resolve(available.height),
    )
}

/// Desired size of a composite control given its resolved constraint and the
/// desired sizes its children reported.
pub fn desired_size(
    params: &LayoutParams,
    resolved: MeasureConstraint,
    children: impl IntoIterator<Item = Size>,
) -> Size {
    let content = children.into_iter().fold(Size::ZERO, Size::max);
    Size::new(
        params.width.desired(resolved.width, content.width),
        params.height.desired(resolved.height, content.height),
    )
}
