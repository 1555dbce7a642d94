//! User-friendly diagnostic messages.
//!
//! Every error shown to a user should carry the root cause, enough context
//! to see what the build tool actually said, and a suggested next step.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no format was selected.
    pub const NO_FORMAT: &str = "help: Pass `--format <name>` or set TESTGYP_FORMAT";

    /// Suggestion when a build tool is missing.
    pub const TOOL_NOT_FOUND: &str =
        "help: Install the tool, add it to PATH, or set its path under [tools] in .gyptest/config.toml";

    /// Suggestion when Visual Studio cannot be found.
    pub const DEVENV_NOT_FOUND: &str =
        "help: Set GYP_MSVS_VERSION to an installed version, or add devenv.com to PATH";

    /// Suggestion when a no-op build did work.
    pub const NOT_UP_TO_DATE: &str =
        "help: Re-run with --verbose to see the exact command line that was invoked";
}

/// Width of section banners in output dumps.
pub const BANNER_WIDTH: usize = 80;

/// Pad a label with `=` to the banner width, e.g. `STDOUT ====...`.
pub fn banner(label: &str) -> String {
    let fill = BANNER_WIDTH.saturating_sub(label.chars().count());
    format!("{}{}", label, "=".repeat(fill))
}

/// Standard dump of a build that should have been a no-op.
///
/// Echoes captured stdout, and stderr when non-empty.
pub fn not_up_to_date_report(stdout: &str, stderr: &str) -> String {
    let mut out = String::from("Build is not up-to-date:\n");
    out.push_str(&banner("STDOUT "));
    out.push('\n');
    out.push_str(stdout);
    out.push('\n');
    if !stderr.is_empty() {
        out.push_str(&banner("STDERR "));
        out.push('\n');
        out.push_str(stderr);
        out.push('\n');
    }
    out
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Captured tool output, shown verbatim
    pub detail: Option<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    fn with_severity(message: impl Into<String>, severity: Severity) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            detail: None,
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Error)
    }

    /// Create a new note diagnostic.
    pub fn note(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Note)
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attach verbatim output.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Note => "note",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if let Some(ref detail) = self.detail {
            output.push('\n');
            output.push_str(detail);
            if !detail.ends_with('\n') {
                output.push('\n');
            }
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            for suggestion in &self.suggestions {
                output.push_str(&format!("{}\n", suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
