//! Verification error types.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::format::Format;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Exit status for a scenario that doesn't apply to the selected format.
pub const EXIT_NO_RESULT: i32 = 2;

/// Error from constructing a scenario or verifying a build.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum VerifyError {
    #[error("unknown format `{0}`")]
    #[diagnostic(
        code(gyptest::format::unknown),
        help("valid formats: gypd, make, msvs, scons, xcode")
    )]
    UnknownFormat(String),

    #[error("no format selected")]
    #[diagnostic(code(gyptest::format::missing))]
    NoFormat,

    #[error("invalid test for `{format}` format; skipping test")]
    #[diagnostic(code(gyptest::format::skipped))]
    Skipped { format: Format },

    #[error("could not find {tool} for the `{format}` format")]
    #[diagnostic(code(gyptest::tool::not_found))]
    ToolNotFound {
        format: Format,
        tool: String,
        searched: Vec<PathBuf>,
    },

    #[error("the `{format}` format does not implement `{operation}`")]
    #[diagnostic(code(gyptest::backend::unsupported))]
    Unsupported {
        format: Format,
        operation: &'static str,
    },

    #[error("`{command}` failed with exit status {}", display_status(.status))]
    #[diagnostic(code(gyptest::build::failed))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        report: String,
    },

    #[error("build is not up-to-date")]
    #[diagnostic(code(gyptest::build::not_up_to_date))]
    NotUpToDate {
        format: Format,
        command: String,
        report: String,
    },

    #[error("{0}")]
    #[diagnostic(code(gyptest::assert::failed))]
    AssertionFailed(String),

    #[error("invalid configuration in {}: {message}", .path.display())]
    #[diagnostic(code(gyptest::config::invalid))]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "(terminated by signal)".to_string(),
    }
}

impl VerifyError {
    /// Whether the scenario was skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, VerifyError::Skipped { .. })
    }

    /// Whether a no-op build did work.
    pub fn is_not_up_to_date(&self) -> bool {
        matches!(self, VerifyError::NotUpToDate { .. })
    }

    /// Process exit status to report for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_skip() {
            EXIT_NO_RESULT
        } else {
            1
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            VerifyError::NoFormat => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_FORMAT)
            }
            VerifyError::Skipped { .. } => Diagnostic::note(self.to_string()),
            VerifyError::ToolNotFound {
                format, searched, ..
            } => {
                let mut diag = Diagnostic::error(self.to_string());
                for path in searched {
                    diag = diag.with_context(format!("looked for {}", path.display()));
                }
                let suggestion = if *format == Format::Msvs {
                    suggestions::DEVENV_NOT_FOUND
                } else {
                    suggestions::TOOL_NOT_FOUND
                };
                diag.with_suggestion(suggestion)
            }
            VerifyError::CommandFailed { report, .. } => {
                Diagnostic::error(self.to_string()).with_detail(report.clone())
            }
            VerifyError::NotUpToDate {
                format,
                command,
                report,
            } => Diagnostic::error(self.to_string())
                .with_context(format!("format: {}", format))
                .with_context(format!("command: {}", command))
                .with_detail(report.clone())
                .with_suggestion(suggestions::NOT_UP_TO_DATE),
            VerifyError::Config { path, .. } => {
                Diagnostic::error(self.to_string()).with_location(path.clone())
            }
            _ => Diagnostic::error(format!("{:#}", self)),
        }
    }
}
