// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Writes errors, warnings, hints and progress notes to stderr, honouring --quiet

use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Status messages on stderr. Results go to stdout through the renderer.
#[derive(Debug, Clone, Copy)]
pub struct CliOutput {
    use_color: bool,
    quiet: bool,
}

impl CliOutput {
    /// Create new CLI output utility with TTY detection
    pub fn new() -> Self {
        Self {
            use_color: std::io::stderr().is_terminal(),
            quiet: false,
        }
    }

    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self {
            use_color,
            quiet: false,
        }
    }

    /// Suppress info, success and status messages
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }

    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        } else {
            eprintln!("warning: {}", message);
        }
    }

    /// Follow-up advice for an error; shown even when quiet
    pub fn hint(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "hint:".cyan(), message);
        } else {
            eprintln!("hint: {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_color {
            eprintln!("{} {}", "info:".blue().bold(), message);
        } else {
            eprintln!("info: {}", message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_color {
            eprintln!("{} {}", "success:".green().bold(), message);
        } else {
            eprintln!("success: {}", message);
        }
    }

    /// Display a progress/status message with an icon
    pub fn status(&self, icon: &str, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_color {
            eprintln!("{} {}", icon.dimmed(), message);
        } else {
            eprintln!("{} {}", icon, message);
        }
    }

    /// Display a debug message (only when RUST_LOG enables debug logging)
    pub fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }

    fn error_line(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "error:".red().bold(), message)
        } else {
            format!("error: {}", message)
        }
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}
