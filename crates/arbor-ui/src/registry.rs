#![forbid(unsafe_code)]

//! Surface-to-window lookup for routing native notifications.

use crate::error::TreeError;
use crate::tree::ControlId;
use arbor_core::SurfaceHandle;
use std::collections::BTreeMap;

/// Outcome of [`WindowRegistry::unregister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unregistered {
    /// Other windows remain.
    Remaining(usize),
    /// That was the last window; the process should shut down.
    Last,
}

/// Maps native surfaces to the windows bound to them.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: BTreeMap<SurfaceHandle, ControlId>,
}

impl WindowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `surface` to `window`. Each surface can be registered once.
    pub fn register(&mut self, surface: SurfaceHandle, window: ControlId) -> Result<(), TreeError> {
        if self.windows.contains_key(&surface) {
            return Err(TreeError::SurfaceAlreadyRegistered(surface));
        }
        self.windows.insert(surface, window);
        arbor_core::debug!(%surface, window = ?window, "window registered");
        Ok(())
    }

    pub fn unregister(&mut self, surface: SurfaceHandle) -> Result<Unregistered, TreeError> {
        if self.windows.remove(&surface).is_none() {
            return Err(TreeError::SurfaceNotRegistered(surface));
        }
        arbor_core::debug!(%surface, remaining = self.windows.len(), "window unregistered");
        Ok(match self.windows.len() {
            0 => Unregistered::Last,
            remaining => Unregistered::Remaining(remaining),
        })
    }

    pub fn resolve(&self, surface: SurfaceHandle) -> Option<ControlId> {
        self.windows.get(&surface).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
