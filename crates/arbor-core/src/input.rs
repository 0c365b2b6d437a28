#![forbid(unsafe_code)]

//! Platform-neutral input vocabulary.

/// Mouse buttons reported by the platform host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}
