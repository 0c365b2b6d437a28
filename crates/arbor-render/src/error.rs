#![forbid(unsafe_code)]

//! Device failures surfaced by render collaborators.

use arbor_core::SurfaceHandle;
use std::fmt;

/// Failure reported when a frame is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// The device was lost; the render target must be recreated.
    DeviceLost,
    /// Any other backend failure.
    Backend(String),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceLost => write!(f, "draw failed: device lost"),
            Self::Backend(reason) => write!(f, "draw failed: {reason}"),
        }
    }
}

impl std::error::Error for DrawError {}

/// Failure managing a render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No render target could be created for the surface.
    TargetCreation {
        surface: SurfaceHandle,
        reason: String,
    },
    /// The backing buffer could not be reallocated.
    Resize {
        width: u32,
        height: u32,
        reason: String,
    },
    /// Presenting the finished frame failed.
    Present(String),
    /// The frame itself failed.
    Draw(DrawError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetCreation { surface, reason } => {
                write!(f, "cannot create render target for {surface}: {reason}")
            }
            Self::Resize {
                width,
                height,
                reason,
            } => write!(f, "cannot resize buffer to {width}x{height}: {reason}"),
            Self::Present(reason) => write!(f, "present failed: {reason}"),
            Self::Draw(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Draw(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<DrawError> for RenderError {
    fn from(err: DrawError) -> Self {
        Self::Draw(err)
    }
}
