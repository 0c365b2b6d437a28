#![forbid(unsafe_code)]

//! Measure/arrange driven through the tree.
//!
//! Measure asks a control for its desired size under a
//! [`MeasureConstraint`]; layout assigns its rect and lets it place its
//! children. Both are started by the parent. [`UiTree::recalculate_layout`]
//! starts them from the root: a window is measured against its exact client
//! size and laid out at its client rect.

use crate::control::{ControlCx, base};
use crate::error::TreeError;
use crate::tree::{ControlId, UiTree};
use arbor_core::{Rect, Size, Thickness};
use arbor_layout::{LayoutParams, MeasureConstraint};

impl UiTree {
    /// Measure `id` against `available`, record and return its desired size.
    pub fn measure(
        &mut self,
        id: ControlId,
        available: MeasureConstraint,
    ) -> Result<Size, TreeError> {
        self.node(id)?;
        let desired = match self.with_behavior(id, |behavior, cx| behavior.on_measure(cx, available))
        {
            Some(desired) => desired,
            None => base::measure(&mut ControlCx::new(self, id), available),
        };
        self.node_mut(id)?.desired_size = desired;
        Ok(desired)
    }

    /// Desired size from the most recent measure.
    pub fn desired_size(&self, id: ControlId) -> Result<Size, TreeError> {
        Ok(self.node(id)?.desired_size)
    }

    /// Place `id` at `rect` (parent coordinates) and run its arrange hook.
    pub fn layout(&mut self, id: ControlId, rect: Rect) -> Result<(), TreeError> {
        self.set_position(id, rect.lefttop())?;
        self.set_size(id, rect.size())?;
        self.with_behavior(id, |behavior, cx| behavior.on_layout(cx, rect));
        Ok(())
    }

    /// Measure and lay out the root `id` belongs to at its current rect.
    pub fn recalculate_layout(&mut self, id: ControlId) -> Result<(), TreeError> {
        let root = self.get_ancestor(id)?;
        let node = self.node(root)?;
        let rect = Rect::from_origin_size(node.position, node.size);
        arbor_core::trace!(root = ?root, width = rect.width, height = rect.height, "relayout");
        self.measure(root, MeasureConstraint::exact(rect.size()))?;
        self.layout(root, rect)
    }

    /// Replace the size policies and spacing, then relayout.
    pub fn set_layout_params(
        &mut self,
        id: ControlId,
        params: LayoutParams,
    ) -> Result<(), TreeError> {
        self.node_mut(id)?.layout_params = params;
        self.recalculate_layout(id)
    }

    pub fn set_padding(&mut self, id: ControlId, padding: Thickness) -> Result<(), TreeError> {
        self.node_mut(id)?.layout_params.padding = padding;
        self.recalculate_layout(id)
    }

    pub fn set_margin(&mut self, id: ControlId, margin: Thickness) -> Result<(), TreeError> {
        self.node_mut(id)?.layout_params.margin = margin;
        self.recalculate_layout(id)
    }
}
