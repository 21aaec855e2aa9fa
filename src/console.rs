//! Console output formatting with ANSI color support.
//!
//! Every line goes to stderr so that stdout only ever carries the
//! transformed text. Colors follow TTY detection on stderr and the
//! NO_COLOR environment variable.

use std::io::{self, IsTerminal};

/// ANSI style codes for terminal formatting.
#[derive(Debug, Clone, Copy)]
pub enum Style {
    Bold,
    Dim,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
}

impl Style {
    /// Returns the ANSI escape code for this style.
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "1",
            Style::Dim => "2",
            Style::Red => "31",
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Blue => "34",
            Style::Magenta => "35",
            Style::Cyan => "36",
            Style::Gray => "90",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Diagnostic output handler.
#[derive(Debug, Clone)]
pub struct Console {
    colors_enabled: bool,
    verbose: bool,
    quiet: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Creates a new Console, detecting color support on stderr.
    pub fn new() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err() && io::stderr().is_terminal();

        Self {
            colors_enabled,
            verbose: false,
            quiet: false,
        }
    }

    /// A console that prints nothing. Used by library callers and tests.
    pub fn silent() -> Self {
        Self {
            colors_enabled: false,
            verbose: false,
            quiet: true,
        }
    }

    /// Enables per-token debug lines.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Applies ANSI styles to text if colors are enabled.
    pub fn style(&self, text: &str, styles: &[Style]) -> String {
        if !self.colors_enabled || styles.is_empty() {
            return text.to_string();
        }

        let codes: Vec<&str> = styles.iter().map(|s| s.code()).collect();
        format!("\x1b[{}m{}{}", codes.join(";"), text, RESET)
    }

    /// Creates a colored label like `[INFO]`.
    pub fn label(&self, label: &str, color: Style) -> String {
        let styled = self.style(label, &[color, Style::Bold]);
        format!("[{}]", styled)
    }

    fn emit(&self, label: &str, color: Style, message: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", self.label(label, color), message);
    }

    /// Prints an info message with blue `[INFO]` label.
    pub fn info(&self, message: &str) {
        self.emit("INFO", Style::Blue, message);
    }

    /// Prints a success message with green `[OK]` label.
    pub fn success(&self, message: &str) {
        self.emit("OK", Style::Green, message);
    }

    /// Prints a warning message with yellow `[WARN]` label.
    pub fn warning(&self, message: &str) {
        self.emit("WARN", Style::Yellow, message);
    }

    /// Prints an error message with red `[ERROR]` label.
    pub fn error(&self, message: &str) {
        self.emit("ERROR", Style::Red, message);
    }

    /// Prints a step message with cyan `[STEP]` label.
    pub fn step(&self, message: &str) {
        self.emit("STEP", Style::Cyan, message);
    }

    /// Prints a gray `[DEBUG]` line when verbose output is on.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            let muted = self.muted(message);
            self.emit("DEBUG", Style::Gray, &muted);
        }
    }

    /// Returns text styled as muted (dim gray).
    pub fn muted(&self, text: &str) -> String {
        self.style(text, &[Style::Gray, Style::Dim])
    }

    /// Formats a token for log lines, e.g. `「計算」`.
    pub fn token(&self, token: &str) -> String {
        self.style(&format!("「{}」", token), &[Style::Magenta, Style::Bold])
    }
}
