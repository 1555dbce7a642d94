//! Verification scenarios.
//!
//! A [`Scenario`] is one test run against one format: it owns the selected
//! backend, the build configuration and a working directory holding a
//! staged copy of the fixture. Scenario code is written once against this
//! type and runs unchanged for every format.
//!
//! ```ignore
//! let mut test = Scenario::builder()
//!     .format(Format::Make)
//!     .fixture("test/hello")
//!     .build()?;
//!
//! test.run_gyp("hello.gyp", &[], None)?;
//! test.build("hello.gyp", &Target::All, &BuildOptions::new())?;
//! test.up_to_date("hello.gyp", &Target::All, &BuildOptions::new())?;
//! let out = test.run_built_executable("hello", &RunOptions::new())?;
//! assert_eq!(out.stdout, "Hello, world!\n");
//! ```

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::builder::errors::VerifyError;
use crate::builder::shim::{Backend, BackendShim, BuildEnv, Invocation};
use crate::builder::toolchain::ToolLocator;
use crate::builder::util::Affixes;
use crate::core::configuration::Configuration;
use crate::core::format::{Format, FormatFilter, FORMAT_ENV};
use crate::core::target::{ArtifactKind, ArtifactSpec, BuildOptions, RunOptions, Target};
use crate::ops::stage;
use crate::util::config::{env_value, Config, GENERATOR_ENV};
use crate::util::diagnostic::not_up_to_date_report;
use crate::util::fs::{self, ensure_dir};
use crate::util::process::{Executor, ProcessBuilder, SystemExecutor};

/// Generator used when none is configured.
#[cfg(windows)]
pub const DEFAULT_GENERATOR: &str = "gyp.bat";
#[cfg(not(windows))]
pub const DEFAULT_GENERATOR: &str = "gyp";

/// Where a scenario keeps its files.
enum Workdir {
    /// Fresh directory removed when the scenario is dropped
    Temp(TempDir),
    /// Caller-owned directory
    Fixed(PathBuf),
}

impl Workdir {
    fn path(&self) -> &Path {
        match self {
            Workdir::Temp(dir) => dir.path(),
            Workdir::Fixed(path) => path,
        }
    }
}

/// Builder for [`Scenario`].
#[derive(Default)]
pub struct ScenarioBuilder {
    format: Option<Format>,
    formats: Vec<String>,
    generator: Option<PathBuf>,
    workdir: Option<PathBuf>,
    fixture: Option<PathBuf>,
    cwd: Option<PathBuf>,
    config: Option<Config>,
    locator: Option<ToolLocator>,
    executor: Option<Box<dyn Executor>>,
    affixes: Option<Affixes>,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the format explicitly, ignoring `TESTGYP_FORMAT`.
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Restrict the formats this scenario applies to.
    ///
    /// `!name` excludes a format; plain names form an include-list.
    pub fn formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats.extend(formats.into_iter().map(Into::into));
        self
    }

    /// Generator to run, ignoring `TESTGYP_GYP`.
    pub fn generator(mut self, generator: impl Into<PathBuf>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// Work in an existing directory instead of a temporary one.
    pub fn workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Stage this fixture directory into the workdir.
    pub fn fixture(mut self, fixture: impl Into<PathBuf>) -> Self {
        self.fixture = Some(fixture.into());
        self
    }

    /// Directory relative generator paths resolve against.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Use this configuration instead of discovering one.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Search for tools with this locator.
    pub fn locator(mut self, locator: ToolLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Run processes through this executor.
    pub fn executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Some(Box::new(executor));
        self
    }

    /// Name artifacts with these affixes instead of the host's.
    pub fn affixes(mut self, affixes: Affixes) -> Self {
        self.affixes = Some(affixes);
        self
    }

    /// Construct the scenario.
    ///
    /// Fails with `Skipped` when the format filter rules the format out,
    /// and with `ToolNotFound` when a backend that cannot fall back has no
    /// driver.
    pub fn build(self) -> Result<Scenario, VerifyError> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()?,
        };
        let config = match self.config {
            Some(config) => config,
            None => Config::discover(&cwd)?,
        };

        let format = resolve_format(self.format, &config)?;

        let filter = FormatFilter::new(&self.formats);
        if !filter.admits(format) {
            tracing::info!("Invalid test for {:?} format; skipping test.", format.as_str());
            return Err(VerifyError::Skipped { format });
        }

        let locator = self.locator.unwrap_or_default();
        let generator = resolve_generator(self.generator, &config, &locator, &cwd);
        let backend = Backend::select(format, &locator, &config)?;

        let workdir = match self.workdir {
            Some(path) => {
                ensure_dir(&path)?;
                Workdir::Fixed(path)
            }
            None => Workdir::Temp(tempfile::Builder::new().prefix("gyptest").tempdir()?),
        };
        tracing::debug!("Working directory: {}", workdir.path().display());

        if let Some(fixture) = self.fixture {
            stage::copy_test_configuration(&fixture, workdir.path())?;
        }

        Ok(Scenario {
            format,
            generator,
            backend,
            configuration: Configuration::new(config.configuration),
            workdir,
            executor: self.executor.unwrap_or_else(|| Box::new(SystemExecutor)),
            affixes: self.affixes.unwrap_or_default(),
            last: None,
        })
    }
}

/// Explicit format, then `TESTGYP_FORMAT`, then the config file.
fn resolve_format(explicit: Option<Format>, config: &Config) -> Result<Format, VerifyError> {
    if let Some(format) = explicit {
        return Ok(format);
    }

    let name = env_value(FORMAT_ENV)
        .or_else(|| config.format.clone())
        .ok_or(VerifyError::NoFormat)?;
    name.parse()
        .map_err(|_| VerifyError::UnknownFormat(name.clone()))
}

/// Explicit generator, then `TESTGYP_GYP`, then the config file, then the
/// platform default, made absolute.
///
/// A bare name is looked up on the search path before being taken
/// relative to `cwd`.
fn resolve_generator(
    explicit: Option<PathBuf>,
    config: &Config,
    locator: &ToolLocator,
    cwd: &Path,
) -> PathBuf {
    let generator = explicit
        .or_else(|| env_value(GENERATOR_ENV).map(PathBuf::from))
        .or_else(|| config.generator.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_GENERATOR));

    if generator.is_absolute() {
        return generator;
    }

    let bare = generator.components().count() == 1;
    if bare {
        if let Some(found) = locator.find(&generator.to_string_lossy()) {
            return found;
        }
    }
    cwd.join(generator)
}

/// One verification run against one format.
pub struct Scenario {
    format: Format,
    generator: PathBuf,
    backend: Backend,
    configuration: Configuration,
    workdir: Workdir,
    executor: Box<dyn Executor>,
    affixes: Affixes,
    last: Option<Invocation>,
}

impl Scenario {
    /// Start building a scenario.
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::new()
    }

    /// Format under test.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Generator executable.
    pub fn generator(&self) -> &Path {
        &self.generator
    }

    /// Selected backend.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Working directory.
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    /// A path below the working directory.
    pub fn workpath(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.workdir.path().join(relative)
    }

    fn env(&self) -> BuildEnv<'_> {
        BuildEnv {
            workdir: self.workdir.path(),
            configuration: &self.configuration,
            executor: self.executor.as_ref(),
            affixes: &self.affixes,
        }
    }

    fn shim(&self) -> &dyn BackendShim {
        self.backend.as_shim()
    }

    fn record(&mut self, invocation: Invocation) -> Invocation {
        self.last = Some(invocation.clone());
        invocation
    }

    /// Run the generator on `project` for this scenario's format.
    pub fn run_gyp<S: AsRef<str>>(
        &mut self,
        project: impl AsRef<Path>,
        args: &[S],
        chdir: Option<&Path>,
    ) -> Result<Invocation, VerifyError> {
        let cmd = ProcessBuilder::new(&self.generator)
            .arg("--depth=.")
            .arg(format!("--format={}", self.format))
            .arg(project.as_ref())
            .args(args.iter().map(AsRef::as_ref));

        let invocation = self.env().run(cmd, chdir)?;
        let invocation = self.record(invocation);
        invocation.ensure_success()
    }

    /// Set the build configuration; `None` restores the tool default.
    pub fn set_configuration(&mut self, configuration: Option<impl Into<String>>) {
        self.configuration = Configuration::new(configuration);
    }

    /// Current build configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Directory name of the current configuration.
    pub fn configuration_dirname(&self) -> &str {
        self.configuration.dirname()
    }

    /// Build name of the current configuration.
    pub fn configuration_buildname(&self) -> &str {
        self.configuration.buildname()
    }

    /// Build `target` from the files generated for `project`.
    ///
    /// A failing build is returned, not raised; check `success()`.
    pub fn build(
        &mut self,
        project: impl AsRef<Path>,
        target: &Target,
        opts: &BuildOptions,
    ) -> Result<Invocation, VerifyError> {
        let invocation = self.shim().build(&self.env(), project.as_ref(), target, opts)?;
        Ok(self.record(invocation))
    }

    /// Build again and require that nothing was done.
    pub fn up_to_date(
        &mut self,
        project: impl AsRef<Path>,
        target: &Target,
        opts: &BuildOptions,
    ) -> Result<Invocation, VerifyError> {
        let opts = self.shim().up_to_date_options(opts);
        let invocation = self
            .shim()
            .build(&self.env(), project.as_ref(), target, &opts)?;
        let invocation = self.record(invocation).ensure_success()?;
        self.shim().check_up_to_date(target, invocation)
    }

    /// Where the backend puts an artifact.
    pub fn built_file_path(&self, artifact: &ArtifactSpec) -> PathBuf {
        self.shim().built_file_path(&self.env(), artifact)
    }

    /// File name of an artifact.
    pub fn built_file_basename(&self, name: &str, kind: ArtifactKind, bare: bool) -> String {
        self.shim().built_file_basename(&self.env(), name, kind, bare)
    }

    /// Run a built executable.
    pub fn run_built_executable(
        &mut self,
        name: &str,
        opts: &RunOptions,
    ) -> Result<Invocation, VerifyError> {
        let invocation = self.shim().run_built_executable(&self.env(), name, opts)?;
        Ok(self.record(invocation))
    }

    /// Fail unless the artifact exists.
    pub fn built_file_must_exist(&self, artifact: &ArtifactSpec) -> Result<(), VerifyError> {
        let path = self.built_file_path(artifact);
        if path.exists() {
            Ok(())
        } else {
            Err(VerifyError::AssertionFailed(format!(
                "missing file: {}",
                path.display()
            )))
        }
    }

    /// Fail if the artifact exists.
    pub fn built_file_must_not_exist(&self, artifact: &ArtifactSpec) -> Result<(), VerifyError> {
        let path = self.built_file_path(artifact);
        if path.exists() {
            Err(VerifyError::AssertionFailed(format!(
                "unexpected file: {}",
                path.display()
            )))
        } else {
            Ok(())
        }
    }

    /// Fail unless the artifact's contents equal `contents`.
    pub fn built_file_must_match(
        &self,
        artifact: &ArtifactSpec,
        contents: impl AsRef<[u8]>,
    ) -> Result<(), VerifyError> {
        let path = self.built_file_path(artifact);
        if fs::read(&path)? == contents.as_ref() {
            Ok(())
        } else {
            Err(VerifyError::AssertionFailed(format!(
                "contents of {} do not match",
                path.display()
            )))
        }
    }

    /// Fail if the artifact's contents equal `contents`.
    pub fn built_file_must_not_match(
        &self,
        artifact: &ArtifactSpec,
        contents: impl AsRef<[u8]>,
    ) -> Result<(), VerifyError> {
        let path = self.built_file_path(artifact);
        if fs::read(&path)? == contents.as_ref() {
            Err(VerifyError::AssertionFailed(format!(
                "contents of {} unexpectedly match",
                path.display()
            )))
        } else {
            Ok(())
        }
    }

    /// Move a path within the workdir, creating the destination's parent.
    pub fn relocate(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<(), VerifyError> {
        stage::relocate(&self.workpath(source), &self.workpath(destination))?;
        Ok(())
    }

    /// Standard output of the last command run.
    pub fn stdout(&self) -> &str {
        self.last.as_ref().map_or("", |inv| inv.stdout.as_str())
    }

    /// Standard error of the last command run.
    pub fn stderr(&self) -> &str {
        self.last.as_ref().map_or("", |inv| inv.stderr.as_str())
    }

    /// The not-up-to-date dump for the last command run.
    pub fn report_not_up_to_date(&self) -> String {
        not_up_to_date_report(self.stdout(), self.stderr())
    }
}
