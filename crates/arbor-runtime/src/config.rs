#![forbid(unsafe_code)]

//! Application, window-class, and window configuration.

use arbor_core::Size;
use arbor_render::Color;
use bitflags::bitflags;

bitflags! {
    /// Window-class style bits passed through to the platform.
    ///
    /// Values follow the classic desktop class-style flags so hosts can
    /// forward them unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassStyle: u32 {
        /// Repaint the whole surface when the height changes.
        const VREDRAW = 0x0001;
        /// Repaint the whole surface when the width changes.
        const HREDRAW = 0x0002;
        /// Report double clicks.
        const DBLCLKS = 0x0008;
    }
}

impl Default for ClassStyle {
    fn default() -> Self {
        Self::HREDRAW | Self::VREDRAW | Self::DBLCLKS
    }
}

/// Icon shown for windows of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StockIcon {
    #[default]
    Application,
    None,
}

/// Pointer shape over windows of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StockCursor {
    #[default]
    Arrow,
    IBeam,
    Hand,
    Wait,
}

/// Description of the window class registered with the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowClassConfig {
    pub name: String,
    pub style: ClassStyle,
    pub icon: StockIcon,
    pub cursor: StockCursor,
    /// Native background brush, visible before the first paint.
    pub background: Color,
}

impl Default for WindowClassConfig {
    fn default() -> Self {
        Self {
            name: "ArborWindow".to_owned(),
            style: ClassStyle::default(),
            icon: StockIcon::Application,
            cursor: StockCursor::Arrow,
            background: Color::BUTTON_FACE,
        }
    }
}

impl WindowClassConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ClassStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: StockCursor) -> Self {
        self.cursor = cursor;
        self
    }
}

/// Configuration for an [`Application`](crate::Application).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Color each frame is cleared to before the tree draws.
    pub background: Color,
    /// Class every window is created from.
    pub window_class: WindowClassConfig,
    /// Exit code reported when the last window is destroyed.
    pub quit_code: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            window_class: WindowClassConfig::default(),
            quit_code: 0,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_window_class(mut self, window_class: WindowClassConfig) -> Self {
        self.window_class = window_class;
        self
    }

    #[must_use]
    pub fn with_quit_code(mut self, quit_code: i32) -> Self {
        self.quit_code = quit_code;
        self
    }
}

/// Per-window creation options.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    /// Client area in logical units; the host picks when `None`.
    pub client_size: Option<Size>,
    /// Show the window right after creation.
    pub visible: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            client_size: None,
            visible: true,
        }
    }
}

impl WindowOptions {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_client_size(mut self, size: Size) -> Self {
        self.client_size = Some(size);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_class_style_redraws_and_reports_double_clicks() {
        let style = ClassStyle::default();
        assert!(style.contains(ClassStyle::HREDRAW | ClassStyle::VREDRAW));
        assert!(style.contains(ClassStyle::DBLCLKS));
        assert_eq!(style.bits(), 0x000B);
    }

    #[test]
    fn builders_override_defaults() {
        let options = WindowOptions::new("main")
            .with_client_size(Size::new(320.0, 200.0))
            .hidden();
        assert_eq!(options.title, "main");
        assert_eq!(options.client_size, Some(Size::new(320.0, 200.0)));
        assert!(!options.visible);

        let config = AppConfig::default().with_quit_code(3);
        assert_eq!(config.quit_code, 3);
        assert_eq!(config.window_class.background, Color::BUTTON_FACE);
    }
}
