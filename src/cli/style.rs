//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Spinner style shared by all progress spinners
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .expect("static template is valid")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""])
}

/// Convenience styling over anything string-like
pub trait Stylize {
    /// The styled source text
    fn text(&self) -> &str;

    /// Emphasized (cyan) text
    fn emphasis(&self) -> String {
        self.text().cyan().to_string()
    }

    /// De-emphasized (dimmed) text
    fn muted(&self) -> String {
        self.text().dimmed().to_string()
    }

    /// Error (red) text
    fn error(&self) -> String {
        self.text().red().to_string()
    }

    /// Warning (yellow) text
    fn warning(&self) -> String {
        self.text().yellow().to_string()
    }

    /// Added-lines (green) text
    fn added(&self) -> String {
        self.text().green().to_string()
    }

    /// Removed-lines (red) text
    fn removed(&self) -> String {
        self.text().red().to_string()
    }

    /// Section header (bold magenta) text
    fn header(&self) -> String {
        self.text().magenta().bold().to_string()
    }
}

impl<T: AsRef<str>> Stylize for T {
    fn text(&self) -> &str {
        self.as_ref()
    }
}
