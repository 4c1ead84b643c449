//! Styled terminal output.
//!
//! Commands print through [`Output`] instead of calling `println!` directly.

use std::fmt::Display;

use console::{Term, style};

pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        drop(self.term.write_line(text));
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✓").green().bold()));
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✗").red().bold()));
    }

    pub fn warning(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("⚠").yellow().bold()));
    }

    pub fn info(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("ℹ").blue().bold()));
    }

    pub fn print(&self, message: impl Display) {
        self.line(&message.to_string());
    }

    pub fn newline(&self) {
        self.line("");
    }

    pub fn header(&self, message: impl Display) {
        self.line(&style(message).bold().cyan().to_string());
    }

    pub fn dim(&self, message: impl Display) {
        self.line(&style(message).dim().to_string());
    }

    /// Print a labeled value, e.g. `  API: http://...`.
    pub fn labeled(&self, label: impl Display, value: impl Display) {
        self.line(&format!("  {}: {value}", style(label).dim()));
    }

    /// Print a total summary line, e.g. `Total: 3 customer(s)`.
    pub fn total(&self, label: impl Display, count: usize, noun: &str) {
        self.line(&format!(
            "\n{}: {}",
            style(label).bold(),
            style(format!("{count} {noun}(s)")).cyan()
        ));
    }
}
