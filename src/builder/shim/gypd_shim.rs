//! gypd backend shim.
//!
//! The gypd generator only dumps the processed input as `.gypd` data files.
//! There is nothing to build or run, so those operations are unsupported.

use std::path::{Path, PathBuf};

use crate::builder::errors::VerifyError;
use crate::builder::shim::trait_def::{BackendShim, BuildEnv, Invocation, LibraryPath};
use crate::builder::toolchain::ToolResolution;
use crate::core::format::Format;
use crate::core::target::{ArtifactSpec, BuildOptions, RunOptions, Target};

/// gypd backend shim. Has no driver.
pub struct GypdShim {
    tool: ToolResolution,
}

impl GypdShim {
    pub fn new() -> Self {
        GypdShim {
            tool: ToolResolution::NotFound,
        }
    }

    fn unsupported(&self, operation: &'static str) -> VerifyError {
        VerifyError::Unsupported {
            format: self.format(),
            operation,
        }
    }
}

impl Default for GypdShim {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendShim for GypdShim {
    fn format(&self) -> Format {
        Format::Gypd
    }

    fn tool(&self) -> &ToolResolution {
        &self.tool
    }

    fn tool_name(&self) -> &'static str {
        "(none)"
    }

    fn build(
        &self,
        _env: &BuildEnv<'_>,
        _project: &Path,
        _target: &Target,
        _opts: &BuildOptions,
    ) -> Result<Invocation, VerifyError> {
        Err(self.unsupported("build"))
    }

    fn check_up_to_date(
        &self,
        _target: &Target,
        _invocation: Invocation,
    ) -> Result<Invocation, VerifyError> {
        Err(self.unsupported("up_to_date"))
    }

    fn built_file_path(&self, env: &BuildEnv<'_>, artifact: &ArtifactSpec) -> PathBuf {
        env.output_path(artifact, &[])
    }

    fn library_path(&self, _env: &BuildEnv<'_>) -> Option<LibraryPath> {
        None
    }

    fn run_built_executable(
        &self,
        _env: &BuildEnv<'_>,
        _name: &str,
        _opts: &RunOptions,
    ) -> Result<Invocation, VerifyError> {
        Err(self.unsupported("run_built_executable"))
    }
}
