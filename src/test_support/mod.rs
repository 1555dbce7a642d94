//! Test utilities and mocks for gyptest unit tests.
//!
//! Provides a mock process executor so backends can be driven against
//! canned tool output, and fixture helpers for staging scenario trees.
//!
//! # Example
//!
//! ```rust,ignore
//! use gyptest::test_support::{MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let mut exec = MockExecutor::new();
//!     exec.expect_prefix("make", MockProcessOutput::success("make: Nothing to be done for `all'.\n"));
//!
//!     // Hand `&exec` to a BuildEnv...
//! }
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::util::process::{Executor, ProcessBuilder, ProcessOutput};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            status: Some(mock.status),
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
struct CommandExpectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
}

/// A command the mock was asked to run.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Full command line
    pub command: String,
    /// Working directory
    pub cwd: Option<PathBuf>,
    /// Environment overrides
    pub env: BTreeMap<String, String>,
}

/// Mock process executor for testing command execution.
///
/// Records every command it is asked to run and replays the output of the
/// first matching expectation.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: RefCell<Vec<RecordedCall>>,
    default_output: Option<MockProcessOutput>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandPattern::Contains(substring.to_string()), output)
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&mut self, pattern: CommandPattern, output: MockProcessOutput) -> &mut Self {
        self.expectations.push(CommandExpectation { pattern, output });
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Command lines of every call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.command.clone()).collect()
    }

    /// Every recorded call, in order.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Environment overrides of the most recent call.
    pub fn last_env(&self) -> Option<BTreeMap<String, String>> {
        self.calls.borrow().last().map(|c| c.env.clone())
    }
}

impl Executor for MockExecutor {
    fn execute(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let full_cmd = cmd.display_command();
        self.calls.borrow_mut().push(RecordedCall {
            command: full_cmd.clone(),
            cwd: cmd.get_cwd().map(PathBuf::from),
            env: cmd.get_env().clone(),
        });

        if let Some(exp) = self.expectations.iter().find(|e| e.pattern.matches(&full_cmd)) {
            return Ok(exp.output.clone().into());
        }

        if let Some(ref default) = self.default_output {
            return Ok(default.clone().into());
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_matches_in_order() {
        let mut exec = MockExecutor::new();
        exec.expect("make all", MockProcessOutput::success("exact"))
            .expect_prefix("make", MockProcessOutput::success("prefix"));

        let out = exec.execute(&ProcessBuilder::new("make").arg("all")).unwrap();
        assert_eq!(out.stdout, "exact");

        let out = exec.execute(&ProcessBuilder::new("make").arg("prog")).unwrap();
        assert_eq!(out.stdout, "prefix");

        assert_eq!(exec.calls(), vec!["make all", "make prog"]);
    }

    #[test]
    fn test_mock_executor_unexpected_command() {
        let exec = MockExecutor::new();
        assert!(exec.execute(&ProcessBuilder::new("scons")).is_err());
        assert_eq!(exec.calls(), vec!["scons"]);
    }

    #[test]
    fn test_mock_executor_records_env_and_cwd() {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::failure(1, "boom"));

        let cmd = ProcessBuilder::new("prog")
            .cwd("/work")
            .env("DYLD_LIBRARY_PATH", "build/Default");
        let out = exec.execute(&cmd).unwrap();

        assert_eq!(out.status, Some(1));
        let call = &exec.recorded()[0];
        assert_eq!(call.cwd.as_deref(), Some(std::path::Path::new("/work")));
        assert_eq!(
            call.env.get("DYLD_LIBRARY_PATH").map(String::as_str),
            Some("build/Default")
        );
    }
}
