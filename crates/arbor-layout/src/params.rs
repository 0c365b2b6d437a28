#![forbid(unsafe_code)]

//! Per-control layout parameters.

use crate::AxisConstraint;
use arbor_core::geometry::Thickness;

/// How a control wants to be sized along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizePolicy {
    /// A fixed length, clamped to what the parent offers.
    Exact(f32),
    /// Take whatever the parent offers; size to content when unbounded.
    MatchParent,
    /// Shrink to the content.
    #[default]
    Content,
}

impl SizePolicy {
    /// The constraint this control measures its children against.
    pub fn resolve(&self, incoming: AxisConstraint) -> AxisConstraint {
        match *self {
            SizePolicy::Exact(length) => {
                let length = if incoming.is_bounded() {
                    length.min(incoming.length)
                } else {
                    length
                };
                AxisConstraint::exact(length.max(0.0))
            }
            SizePolicy::MatchParent => incoming,
            SizePolicy::Content => {
                if incoming.is_bounded() {
                    AxisConstraint::at_most(incoming.length)
                } else {
                    AxisConstraint::UNBOUNDED
                }
            }
        }
    }

    /// Desired length once the children reported `content` on this axis.
    pub fn desired(&self, resolved: AxisConstraint, content: f32) -> f32 {
        match self {
            SizePolicy::Exact(_) => resolved.length,
            SizePolicy::MatchParent if resolved.is_bounded() => resolved.length,
            SizePolicy::MatchParent | SizePolicy::Content => resolved.fit(content),
        }
    }
}

/// Layout parameters a control carries through measure and arrange.
///
/// Padding and margin are transported for containers that want them; the
/// base measure does not subtract them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutParams {
    pub width: SizePolicy,
    pub height: SizePolicy,
    pub padding: Thickness,
    pub margin: Thickness,
}

impl LayoutParams {
    pub const fn new(width: SizePolicy, height: SizePolicy) -> Self {
        Self {
            width,
            height,
            padding: Thickness::ZERO,
            margin: Thickness::ZERO,
        }
    }

    #[must_use]
    pub const fn padding(mut self, padding: Thickness) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub const fn margin(mut self, margin: Thickness) -> Self {
        self.margin = margin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::SizePolicy;
    use crate::AxisConstraint;

    #[test]
    fn exact_under_unbounded_keeps_length() {
        assert_eq!(
            SizePolicy::Exact(42.0).resolve(AxisConstraint::UNBOUNDED),
            AxisConstraint::exact(42.0)
        );
    }

    #[test]
    fn match_parent_sizes_to_content_only_when_unbounded() {
        let bounded = SizePolicy::MatchParent.resolve(AxisConstraint::at_most(30.0));
        assert_eq!(SizePolicy::MatchParent.desired(bounded, 5.0), 30.0);
        let open = SizePolicy::MatchParent.resolve(AxisConstraint::UNBOUNDED);
        assert_eq!(SizePolicy::MatchParent.desired(open, 5.0), 5.0);
    }
}
