//! Make backend shim - drives generated Makefiles.

use std::path::{Path, PathBuf};

use crate::builder::errors::VerifyError;
use crate::builder::shim::trait_def::{BackendShim, BuildEnv, Invocation, LibraryPath};
use crate::builder::toolchain::{ToolLocator, ToolResolution};
use crate::core::format::Format;
use crate::core::target::{ArtifactKind, ArtifactSpec, BuildOptions, Target};
use crate::util::process::ProcessBuilder;

/// Make backend shim.
pub struct MakeShim {
    tool: ToolResolution,
}

impl MakeShim {
    /// Driver candidates, in preference order.
    pub const TOOL_CANDIDATES: &'static [&'static str] = &["make"];

    /// Spelling of the build-everything target.
    pub const ALL_TARGET: &'static str = "all";

    /// Top-level makefile the generator writes for whole-tree builds.
    pub const MAKEFILE: &'static str = "Makefile";

    /// Default library subdirectory for static libraries.
    pub const STATIC_LIBDIR: &'static str = "obj.target";

    /// Default library subdirectory for shared libraries.
    pub const SHARED_LIBDIR: &'static str = "lib.target";

    /// Resolve `make`, with an optional configured path tried first.
    pub fn new(locator: &ToolLocator, explicit: Option<&Path>) -> Self {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(path) = explicit {
            candidates.push(path.to_string_lossy().into_owned());
        }
        candidates.extend(Self::TOOL_CANDIDATES.iter().map(|s| s.to_string()));

        MakeShim {
            tool: locator.locate(&candidates),
        }
    }

    /// The exact stdout `make` prints when `target` has nothing to do.
    pub fn up_to_date_message(target: &Target) -> String {
        let target = match target {
            Target::Default | Target::All => Self::ALL_TARGET,
            Target::Named(name) => name.as_str(),
        };
        format!("make: Nothing to be done for `{}'.\n", target)
    }

    /// Per-project makefile used when a sub-directory build has no
    /// top-level `Makefile`.
    pub fn project_makefile(project: &Path) -> PathBuf {
        project.with_extension("Makefile")
    }

    /// Arguments for a build, given whether the top-level makefile exists.
    pub fn build_args(
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
        has_makefile: bool,
    ) -> Vec<String> {
        let mut args = opts.arguments.clone();

        if let Some(config) = env.configuration.as_deref() {
            args.push(format!("BUILDTYPE={}", config));
        }

        match target {
            Target::Default => {}
            Target::All => args.push(Self::ALL_TARGET.to_string()),
            Target::Named(name) => args.push(name.clone()),
        }

        if !has_makefile {
            args.insert(0, "-f".to_string());
            args.insert(
                1,
                Self::project_makefile(project)
                    .to_string_lossy()
                    .into_owned(),
            );
        }

        args
    }
}

impl BackendShim for MakeShim {
    fn format(&self) -> Format {
        Format::Make
    }

    fn tool(&self) -> &ToolResolution {
        &self.tool
    }

    fn tool_name(&self) -> &'static str {
        "make"
    }

    fn build(
        &self,
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
    ) -> Result<Invocation, VerifyError> {
        let makefile = env.run_dir(opts.chdir()).join(Self::MAKEFILE);
        let has_makefile = makefile.exists();
        if !has_makefile {
            tracing::debug!("no {} in {}", Self::MAKEFILE, makefile.display());
        }

        let args = Self::build_args(env, project, target, opts, has_makefile);
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

    fn built_file_path(&self, env: &BuildEnv<'_>, artifact: &ArtifactSpec) -> PathBuf {
        let config = env.configuration.dirname();
        let libdir = match artifact.kind {
            ArtifactKind::StaticLib => Some(artifact.libdir.as_deref().unwrap_or(Self::STATIC_LIBDIR)),
            ArtifactKind::SharedLib => Some(artifact.libdir.as_deref().unwrap_or(Self::SHARED_LIBDIR)),
            ArtifactKind::Executable | ArtifactKind::Unspecified => None,
        };

        let mut dirs = vec!["out", config];
        dirs.extend(libdir);
        env.output_path(artifact, &dirs)
    }

    fn library_path(&self, env: &BuildEnv<'_>) -> Option<LibraryPath> {
        // Host-tool and target libraries may coexist; search both.
        let libdir = Path::new("out").join(env.configuration.dirname()).join("lib");
        let libdir = libdir.to_string_lossy();
        Some(LibraryPath {
            var: "LD_LIBRARY_PATH",
            value: format!("{}.host:{}.target", libdir, libdir),
        })
    }
}
