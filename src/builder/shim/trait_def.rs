//! BackendShim trait definition and result types.
//!
//! The BackendShim trait is the contract every build backend satisfies, so
//! that a scenario can be written once and run against any format.

use std::path::{Path, PathBuf};

use crate::builder::errors::VerifyError;
use crate::builder::toolchain::ToolResolution;
use crate::builder::util::Affixes;
use crate::core::configuration::Configuration;
use crate::core::format::Format;
use crate::core::target::{ArtifactKind, ArtifactSpec, BuildOptions, RunOptions, Target};
use crate::util::diagnostic::not_up_to_date_report;
use crate::util::process::{Executor, ProcessBuilder, ProcessOutput};

/// Result of running a build tool or built program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command line as it was run
    pub command: String,

    /// Directory the command ran in
    pub cwd: PathBuf,

    /// Exit code, `None` if killed by a signal
    pub status: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

impl Invocation {
    /// Combine a command with its captured output.
    pub fn new(cmd: &ProcessBuilder, output: ProcessOutput) -> Self {
        Invocation {
            command: cmd.display_command(),
            cwd: cmd.get_cwd().map(Path::to_path_buf).unwrap_or_default(),
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Standard not-up-to-date dump of this invocation.
    pub fn report(&self) -> String {
        not_up_to_date_report(&self.stdout, &self.stderr)
    }

    /// Turn a non-zero exit into an error.
    pub fn ensure_success(self) -> Result<Self, VerifyError> {
        if self.success() {
            Ok(self)
        } else {
            Err(VerifyError::CommandFailed {
                command: self.command.clone(),
                status: self.status,
                report: self.report(),
            })
        }
    }

    /// Fail as not up-to-date, logging the standard dump.
    pub fn not_up_to_date(&self, format: Format) -> VerifyError {
        let report = self.report();
        tracing::error!("{}", report.trim_end());
        VerifyError::NotUpToDate {
            format,
            command: self.command.clone(),
            report,
        }
    }

    /// Require stdout to equal `expected` exactly.
    pub fn expect_stdout(self, format: Format, expected: &str) -> Result<Self, VerifyError> {
        if self.stdout == expected {
            Ok(self)
        } else {
            tracing::debug!("expected stdout {:?}, got {:?}", expected, self.stdout);
            Err(self.not_up_to_date(format))
        }
    }
}

/// Library search variable a backend sets when running built programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPath {
    /// Environment variable name
    pub var: &'static str,
    /// Value, relative to the run directory
    pub value: String,
}

/// Scenario state a backend operates on.
///
/// Borrowed from the owning scenario for the duration of one call.
#[derive(Clone, Copy)]
pub struct BuildEnv<'a> {
    /// Scenario working directory; all paths resolve under it
    pub workdir: &'a Path,

    /// Current build configuration
    pub configuration: &'a Configuration,

    /// Process runner
    pub executor: &'a dyn Executor,

    /// Platform file-name affixes
    pub affixes: &'a Affixes,
}

impl<'a> BuildEnv<'a> {
    /// Join path components onto the workdir.
    pub fn workpath<I, P>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        parts
            .into_iter()
            .fold(self.workdir.to_path_buf(), |path, part| path.join(part))
    }

    /// Directory a command runs in: the workdir, or a subdirectory of it.
    pub fn run_dir(&self, chdir: Option<&Path>) -> PathBuf {
        match chdir {
            Some(dir) => self.workdir.join(dir),
            None => self.workdir.to_path_buf(),
        }
    }

    /// Run a command in the workdir (or `chdir` below it).
    pub fn run(&self, cmd: ProcessBuilder, chdir: Option<&Path>) -> Result<Invocation, VerifyError> {
        let cmd = cmd.cwd(self.run_dir(chdir));
        tracing::debug!("Running in {}: {}", self.run_dir(chdir).display(), cmd.display_command());
        let output = self.executor.execute(&cmd)?;
        Ok(Invocation::new(&cmd, output))
    }

    /// Output path under `chdir` for the given relative components and file.
    pub fn output_path(&self, artifact: &ArtifactSpec, dirs: &[&str]) -> PathBuf {
        let mut path = self.workdir.to_path_buf();
        if let Some(ref chdir) = artifact.chdir {
            path.push(chdir);
        }
        for dir in dirs {
            path.push(dir);
        }
        path.push(
            self.affixes
                .basename(&artifact.name, artifact.kind, artifact.bare),
        );
        path
    }
}

/// BackendShim trait - interface for build backends.
///
/// `build` translates target and configuration into the tool's own argument
/// grammar. `up_to_date` builds again and fails unless the tool reported
/// that nothing was done. `built_file_path` never touches the filesystem.
pub trait BackendShim {
    /// Format this backend drives.
    fn format(&self) -> Format;

    /// How the build tool was resolved at construction.
    fn tool(&self) -> &ToolResolution;

    /// Human-readable name of the native driver.
    fn tool_name(&self) -> &'static str;

    /// Run a build of `target` from the configuration generated for `project`.
    fn build(
        &self,
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
    ) -> Result<Invocation, VerifyError>;

    /// Options for a no-op build, derived from the caller's.
    fn up_to_date_options(&self, opts: &BuildOptions) -> BuildOptions {
        opts.clone()
    }

    /// Decide from a successful build's output whether it did any work.
    fn check_up_to_date(
        &self,
        target: &Target,
        invocation: Invocation,
    ) -> Result<Invocation, VerifyError>;

    /// Build again and require that no work was done.
    ///
    /// A failed build is `CommandFailed`; a successful build that did work
    /// is `NotUpToDate`.
    fn up_to_date(
        &self,
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
    ) -> Result<Invocation, VerifyError> {
        let invocation = self.build(env, project, target, &self.up_to_date_options(opts))?;
        self.check_up_to_date(target, invocation.ensure_success()?)
    }

    /// Where this backend puts the described artifact.
    fn built_file_path(&self, env: &BuildEnv<'_>, artifact: &ArtifactSpec) -> PathBuf;

    /// Library search variable needed to run built executables, if any.
    fn library_path(&self, env: &BuildEnv<'_>) -> Option<LibraryPath>;

    /// File name of an artifact, with platform affixes unless `bare`.
    fn built_file_basename(
        &self,
        env: &BuildEnv<'_>,
        name: &str,
        kind: ArtifactKind,
        bare: bool,
    ) -> String {
        env.affixes.basename(name, kind, bare)
    }

    /// Run an executable produced by a build.
    ///
    /// The library search variable is passed to the child only; the
    /// process environment is left untouched.
    fn run_built_executable(
        &self,
        env: &BuildEnv<'_>,
        name: &str,
        opts: &RunOptions,
    ) -> Result<Invocation, VerifyError> {
        let artifact = ArtifactSpec::executable(name).with_chdir(opts.chdir.clone());
        let program = self.built_file_path(env, &artifact);

        let mut cmd = ProcessBuilder::new(program).args(&opts.arguments);
        if let Some(lib) = self.library_path(env) {
            tracing::debug!("{}={}", lib.var, lib.value);
            cmd = cmd.env(lib.var, &lib.value);
        }

        env.run(cmd, opts.chdir.as_deref())
    }

    /// The tool to invoke, or an error if this backend has none.
    fn require_tool(&self) -> Result<&Path, VerifyError> {
        self.tool().path().ok_or_else(|| VerifyError::ToolNotFound {
            format: self.format(),
            tool: self.tool_name().to_string(),
            searched: Vec::new(),
        })
    }
}
