#![forbid(unsafe_code)]

//! Platform failures and the fatal error returned by the run loop.

use arbor_render::RenderError;
use arbor_ui::{TreeError, UiError};
use std::fmt;

/// The platform could not provide a class or surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    ClassRegistration { class: String, reason: String },
    SurfaceCreation { reason: String },
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassRegistration { class, reason } => {
                write!(f, "cannot register window class {class:?}: {reason}")
            }
            Self::SurfaceCreation { reason } => write!(f, "cannot create native surface: {reason}"),
        }
    }
}

impl std::error::Error for PlatformError {}

/// A failure that aborts the current operation.
///
/// Returned from [`Application::run`](crate::Application::run), it stops the
/// loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Contract violation on the tree or registry.
    Tree(TreeError),
    /// Device failure while creating, resizing, or painting a target.
    Render(RenderError),
    /// Host failure while registering a class or creating a surface.
    Platform(PlatformError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "tree error: {err}"),
            Self::Render(err) => write!(f, "render error: {err}"),
            Self::Platform(err) => write!(f, "platform error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::Platform(err) => Some(err),
        }
    }
}

impl From<TreeError> for AppError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

impl From<PlatformError> for AppError {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err)
    }
}

impl From<UiError> for AppError {
    fn from(err: UiError) -> Self {
        match err {
            UiError::Tree(err) => Self::Tree(err),
            UiError::Render(err) => Self::Render(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_render::DrawError;
    use std::error::Error;

    #[test]
    fn ui_errors_flatten() {
        let err = AppError::from(UiError::Render(RenderError::Draw(DrawError::DeviceLost)));
        assert!(matches!(err, AppError::Render(RenderError::Draw(_))));
        assert!(err.source().is_some());
    }

    #[test]
    fn platform_error_names_class() {
        let err = PlatformError::ClassRegistration {
            class: "Main".to_owned(),
            reason: "denied".to_owned(),
        };
        assert_eq!(err.to_string(), "cannot register window class \"Main\": denied");
    }
}
