//! Pretty printing for environment validation errors.
//!
//! This module renders `EnvErrors` with optional ANSI color, suggestion
//! hints, and truncation. Color is only emitted when the output is a real
//! terminal and neither `NO_COLOR` nor `CI` is set.
//!
//! # Output Format
//!
//! ```text
//! Errors found while validating environment variables
//!   PORT must be an integer between 0 and 65535 (was 99999)
//!   DEBUG must be a boolean (was "maybe")
//!
//! Hints:
//!   • Set HOST in your environment
//! ```

use std::io::Write;

use crate::error::{EnvError, EnvErrors, DEFAULT_HEADER};

/// Options for pretty printing errors.
#[derive(Debug, Clone)]
pub struct PrettyPrintOptions {
    /// Enable colored output (auto-detected by default).
    pub color: ColorOption,
    /// Show fix suggestions.
    pub show_suggestions: bool,
    /// Maximum errors to display (None for all).
    pub max_errors: Option<usize>,
    /// Custom top-level message (defaults to the standard header).
    pub header: Option<String>,
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self {
            color: ColorOption::Auto,
            show_suggestions: true,
            max_errors: Some(20),
            header: None,
        }
    }
}

impl PrettyPrintOptions {
    /// Create options with colors disabled.
    pub fn no_color() -> Self {
        Self {
            color: ColorOption::Never,
            ..Default::default()
        }
    }

    /// Create options that show all errors (no truncation).
    pub fn show_all() -> Self {
        Self {
            max_errors: None,
            ..Default::default()
        }
    }

    /// Set the color option.
    pub fn with_color(mut self, color: ColorOption) -> Self {
        self.color = color;
        self
    }

    /// Set whether to show suggestions.
    pub fn with_suggestions(mut self, show: bool) -> Self {
        self.show_suggestions = show;
        self
    }

    /// Set the maximum number of errors to display.
    pub fn with_max_errors(mut self, max: Option<usize>) -> Self {
        self.max_errors = max;
        self
    }

    /// Set a custom top-level message.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// Color output option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOption {
    /// Auto-detect: requires a TTY and neither `NO_COLOR` nor `CI` set.
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// ANSI color codes for terminal output.
struct Colors {
    error: &'static str,
    path: &'static str,
    hint: &'static str,
    reset: &'static str,
}

impl Colors {
    fn enabled() -> Self {
        Self {
            error: "\x1b[1;31m", // bold red
            path: "\x1b[1;37m",  // bold white
            hint: "\x1b[32m",    // green
            reset: "\x1b[0m",
        }
    }

    fn disabled() -> Self {
        Self {
            error: "",
            path: "",
            hint: "",
            reset: "",
        }
    }
}

/// Internal error printer that handles formatting.
struct ErrorPrinter<'a> {
    options: &'a PrettyPrintOptions,
    colors: Colors,
}

impl<'a> ErrorPrinter<'a> {
    fn new(options: &'a PrettyPrintOptions, use_color: bool) -> Self {
        let colors = if use_color {
            Colors::enabled()
        } else {
            Colors::disabled()
        };
        Self { options, colors }
    }

    fn print(&self, errors: &EnvErrors, writer: &mut dyn Write) {
        let c = &self.colors;
        let header = self.options.header.as_deref().unwrap_or(DEFAULT_HEADER);

        writeln!(writer, "{}{}{}", c.error, header, c.reset).ok();

        for (shown, error) in errors.iter().enumerate() {
            if let Some(max) = self.options.max_errors {
                if shown >= max {
                    let remaining = errors.len() - shown;
                    writeln!(writer, "  ...and {} more errors", remaining).ok();
                    break;
                }
            }
            self.print_error(error, writer);
        }

        if self.options.show_suggestions {
            self.print_suggestions(errors, writer);
        }
    }

    fn print_error(&self, error: &EnvError, writer: &mut dyn Write) {
        let c = &self.colors;

        match error {
            EnvError::Validation { path, message } => {
                writeln!(writer, "  {}{}{} {}", c.path, path, c.reset, message).ok();
            }
            other => {
                let rendered = other.to_string();
                match rendered.split_once(' ') {
                    Some((path, rest)) if path == other.path() => {
                        writeln!(writer, "  {}{}{} {}", c.path, path, c.reset, rest).ok();
                    }
                    _ => {
                        writeln!(writer, "  {}", rendered).ok();
                    }
                }
            }
        }
    }

    fn print_suggestions(&self, errors: &EnvErrors, writer: &mut dyn Write) {
        let c = &self.colors;
        let suggestions: Vec<_> = errors.iter().filter_map(|e| e.suggestion()).take(3).collect();

        if !suggestions.is_empty() {
            writeln!(writer, "\n{}Hints:{}", c.hint, c.reset).ok();
            for suggestion in suggestions {
                writeln!(writer, "  • {}", suggestion).ok();
            }
        }
    }
}

/// Detect whether colored output should be emitted.
///
/// `NO_COLOR` and `CI` are respected regardless of TTY status.
fn should_use_color(color_option: ColorOption) -> bool {
    match color_option {
        ColorOption::Always => true,
        ColorOption::Never => false,
        ColorOption::Auto => {
            if std::env::var_os("NO_COLOR").is_some() || std::env::var_os("CI").is_some() {
                return false;
            }
            use std::io::IsTerminal;
            std::io::stderr().is_terminal()
        }
    }
}

impl EnvErrors {
    /// Pretty print errors to stderr.
    pub fn pretty_print(&self, options: &PrettyPrintOptions) {
        let use_color = should_use_color(options.color);
        let printer = ErrorPrinter::new(options, use_color);
        let mut stderr = std::io::stderr();
        printer.print(self, &mut stderr);
    }

    /// Pretty print to a string (for testing).
    pub fn format(&self, options: &PrettyPrintOptions) -> String {
        let use_color = match options.color {
            ColorOption::Always => true,
            // String formatting has no terminal to probe
            ColorOption::Never | ColorOption::Auto => false,
        };
        let printer = ErrorPrinter::new(options, use_color);
        let mut buf = Vec::new();
        printer.print(self, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }

    /// Pretty print with default options.
    pub fn pretty_print_default(&self) {
        self.pretty_print(&PrettyPrintOptions::default());
    }
}
