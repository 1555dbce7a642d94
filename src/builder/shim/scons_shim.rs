//! SCons backend shim.

use std::path::{Path, PathBuf};

use crate::builder::errors::VerifyError;
use crate::builder::shim::trait_def::{BackendShim, BuildEnv, Invocation, LibraryPath};
use crate::builder::toolchain::{ToolLocator, ToolResolution};
use crate::core::format::Format;
use crate::core::target::{ArtifactKind, ArtifactSpec, BuildOptions, Target};
use crate::util::process::ProcessBuilder;

/// SCons backend shim.
pub struct SconsShim {
    tool: ToolResolution,
}

impl SconsShim {
    /// Driver candidates, in preference order.
    pub const TOOL_CANDIDATES: &'static [&'static str] = &["scons", "scons.py"];

    /// Spelling of the build-everything target.
    pub const ALL_TARGET: &'static str = "all";

    /// Subdirectory holding both kinds of library.
    pub const LIBDIR: &'static str = "lib";

    /// Flag that silences everything but the up-to-date lines.
    pub const QUIET: &'static str = "-Q";

    /// Resolve `scons`, with an optional configured path tried first.
    pub fn new(locator: &ToolLocator, explicit: Option<&Path>) -> Self {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(path) = explicit {
            candidates.push(path.to_string_lossy().into_owned());
        }
        candidates.extend(Self::TOOL_CANDIDATES.iter().map(|s| s.to_string()));

        SconsShim {
            tool: locator.locate(&candidates),
        }
    }

    /// Words making up a target, as SCons sees them.
    fn target_words(target: &Target) -> Vec<&str> {
        match target {
            Target::Default | Target::All => vec![Self::ALL_TARGET],
            Target::Named(name) => name.split_whitespace().collect(),
        }
    }

    /// The exact stdout `scons -Q` prints when every word of `target` is
    /// already current.
    pub fn up_to_date_message(target: &Target) -> String {
        Self::target_words(target)
            .into_iter()
            .map(|word| format!("scons: `{}' is up to date.\n", word))
            .collect()
    }

    /// Arguments for a build of `target`.
    pub fn build_args(
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
    ) -> Vec<String> {
        let mut args = opts.arguments.clone();

        if let Some(dir) = project.parent().filter(|d| !d.as_os_str().is_empty()) {
            args.push("-C".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }

        if let Some(config) = env.configuration.as_deref() {
            args.push(format!("--mode={}", config));
        }

        if !target.is_default() {
            args.extend(Self::target_words(target).into_iter().map(str::to_string));
        }

        args
    }
}

impl BackendShim for SconsShim {
    fn format(&self) -> Format {
        Format::Scons
    }

    fn tool(&self) -> &ToolResolution {
        &self.tool
    }

    fn tool_name(&self) -> &'static str {
        "scons"
    }

    fn build(
        &self,
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
    ) -> Result<Invocation, VerifyError> {
        let args = Self::build_args(env, project, target, opts);
        let cmd = ProcessBuilder::new(self.require_tool()?).args(args);
        env.run(cmd, opts.chdir())
    }

    fn check_up_to_date(
        &self,
        target: &Target,
        invocation: Invocation,
    ) -> Result<Invocation, VerifyError> {
        let expected = Self::up_to_date_message(target);
        invocation.expect_stdout(self.format(), &expected)
    }

    fn up_to_date_options(&self, opts: &BuildOptions) -> BuildOptions {
        opts.clone().with_arg(Self::QUIET)
    }

    fn built_file_path(&self, env: &BuildEnv<'_>, artifact: &ArtifactSpec) -> PathBuf {
        let mut dirs = vec![env.configuration.dirname()];
        if matches!(artifact.kind, ArtifactKind::StaticLib | ArtifactKind::SharedLib) {
            // The libdir override is make-only.
            dirs.push(Self::LIBDIR);
        }
        env.output_path(artifact, &dirs)
    }

    fn library_path(&self, env: &BuildEnv<'_>) -> Option<LibraryPath> {
        let libdir = Path::new(env.configuration.dirname()).join(Self::LIBDIR);
        Some(LibraryPath {
            var: "LD_LIBRARY_PATH",
            value: libdir.to_string_lossy().into_owned(),
        })
    }
}
