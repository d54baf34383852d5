//! Terminal styling.

use console::style;

/// Color theme for terminal output.
#[derive(Debug, Default)]
pub struct GantryTheme;

impl GantryTheme {
    /// Create a theme.
    pub fn new() -> Self {
        Self
    }

    /// Format a success line.
    pub fn format_success(&self, msg: &str) -> String {
        format!("{} {}", style("✔").green(), msg)
    }

    /// Format a warning line.
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{} {}", style("!").yellow(), msg)
    }

    /// Format an error line.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{} {}", style("✖").red(), msg)
    }
}

/// Whether colored output should be used.
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled()
}
