#![forbid(unsafe_code)]

//! Errors raised by tree mutation, window bookkeeping, and painting.

use arbor_core::SurfaceHandle;
use arbor_render::RenderError;
use std::fmt;

/// A structural or bookkeeping operation was rejected.
///
/// Every variant leaves the tree exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The control is already a child of another control.
    AlreadyHasParent,
    /// Windows are always roots and cannot be added as children.
    WindowAsChild,
    /// The control is not a child of the given parent.
    NotAChild,
    /// Insertion or removal index outside `0..=len` (insert) or `0..len` (remove).
    PositionOutOfRange { position: usize, len: usize },
    /// The id does not name a live control.
    UnknownControl,
    /// The id names a control that is not a window.
    NotAWindow,
    /// The control belongs to a different window (or none).
    NotInWindow,
    /// The control must be detached from its parent first.
    StillAttached,
    /// Windows are disposed by destroying their surface.
    LiveWindow,
    /// Adding the child would make a control its own ancestor.
    WouldCreateCycle,
    /// Another window already owns this surface.
    SurfaceAlreadyRegistered(SurfaceHandle),
    /// No window owns this surface.
    SurfaceNotRegistered(SurfaceHandle),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyHasParent => write!(f, "control already has a parent"),
            Self::WindowAsChild => write!(f, "a window cannot be added as a child"),
            Self::NotAChild => write!(f, "control is not a child of the given parent"),
            Self::PositionOutOfRange { position, len } => {
                write!(f, "child position {position} out of range for {len} children")
            }
            Self::UnknownControl => write!(f, "unknown control"),
            Self::NotAWindow => write!(f, "control is not a window"),
            Self::NotInWindow => write!(f, "control does not belong to this window"),
            Self::StillAttached => write!(f, "control still has a parent"),
            Self::LiveWindow => write!(f, "window surface is still alive"),
            Self::WouldCreateCycle => write!(f, "control cannot become its own ancestor"),
            Self::SurfaceAlreadyRegistered(surface) => {
                write!(f, "{surface} is already registered")
            }
            Self::SurfaceNotRegistered(surface) => write!(f, "{surface} is not registered"),
        }
    }
}

impl std::error::Error for TreeError {}

/// Failure while painting or resizing a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    Tree(TreeError),
    Render(RenderError),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<TreeError> for UiError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<RenderError> for UiError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_render::DrawError;
    use std::error::Error;

    #[test]
    fn display_includes_range() {
        let err = TreeError::PositionOutOfRange { position: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "child position 4 out of range for 2 children"
        );
    }

    #[test]
    fn ui_error_exposes_source() {
        let err = UiError::from(RenderError::from(DrawError::DeviceLost));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("device lost"));
    }
}
