//! TUI theme and styling

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Background and borders
    pub background: Color,
    pub border: Color,
    pub selection: Color,

    // Text colors
    pub title: Color,
    pub subtitle: Color,
    pub text: Color,
    pub dimmed: Color,
    pub hint: Color,

    // Task state
    pub open: Color,
    pub done: Color,
    pub error: Color,

    // UI elements
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}

impl Theme {
    /// Theme by config name; unknown names fall back to the default.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "phosphor" => Self::phosphor(),
            _ => Self::slate(),
        }
    }

    pub fn slate() -> Self {
        Self {
            background: Color::Rgb(15, 23, 42),
            border: Color::Rgb(51, 65, 85),
            selection: Color::Rgb(30, 41, 59),

            title: Color::Rgb(16, 185, 129),
            subtitle: Color::Rgb(209, 250, 229),
            text: Color::Rgb(241, 245, 249),
            dimmed: Color::Rgb(100, 116, 139),
            hint: Color::Rgb(71, 85, 105),

            open: Color::Rgb(16, 185, 129),
            done: Color::Rgb(100, 116, 139),
            error: Color::Rgb(248, 113, 113),

            accent: Color::Rgb(20, 184, 166),
        }
    }

    pub fn phosphor() -> Self {
        Self {
            background: Color::Rgb(16, 20, 18),
            border: Color::Rgb(45, 70, 55),
            selection: Color::Rgb(30, 50, 40),

            title: Color::Rgb(57, 255, 20),
            subtitle: Color::Rgb(100, 160, 120),
            text: Color::Rgb(180, 255, 180),
            dimmed: Color::Rgb(80, 120, 90),
            hint: Color::Rgb(100, 160, 120),

            open: Color::Rgb(0, 255, 180),
            done: Color::Rgb(60, 100, 70),
            error: Color::Rgb(255, 100, 80),

            accent: Color::Rgb(57, 255, 20),
        }
    }
}
