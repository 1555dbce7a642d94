//! Visual Studio backend shim - drives generated solutions with devenv.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::builder::errors::VerifyError;
use crate::builder::shim::trait_def::{BackendShim, BuildEnv, Invocation, LibraryPath};
use crate::builder::toolchain::msvc::{DevenvDiscovery, DevenvSelection, MsvsGeneration};
use crate::builder::toolchain::ToolResolution;
use crate::core::format::Format;
use crate::core::target::{ArtifactKind, ArtifactSpec, BuildOptions, Target};
use crate::util::process::ProcessBuilder;

/// Summary line devenv prints at the end of a build.
static UP_TO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)=== Build: 0 succeeded, 0 failed, (\d+) up-to-date, 0 skipped ===")
        .expect("valid regex")
});

/// Visual Studio backend shim.
pub struct MsvsShim {
    tool: ToolResolution,
    generation: MsvsGeneration,
}

impl MsvsShim {
    /// Solution file extension.
    pub const SOLUTION_EXTENSION: &'static str = "sln";

    /// Subdirectory holding static libraries.
    pub const STATIC_LIBDIR: &'static str = "lib";

    /// Number of up-to-date projects a no-op build must report.
    pub const EXPECTED_UP_TO_DATE: u32 = 1;

    /// Construct from a completed discovery.
    ///
    /// Fails when no driver was found anywhere.
    pub fn new(discovery: &DevenvDiscovery<'_>) -> Result<Self, VerifyError> {
        let DevenvSelection {
            resolution,
            generation,
        } = discovery.discover();

        if !resolution.is_located() {
            return Err(VerifyError::ToolNotFound {
                format: Format::Msvs,
                tool: crate::builder::toolchain::msvc::DEVENV.to_string(),
                searched: discovery.searched(),
            });
        }

        Ok(MsvsShim {
            tool: resolution,
            generation,
        })
    }

    /// Build engine generation of the selected install.
    pub fn generation(&self) -> MsvsGeneration {
        self.generation
    }

    /// Whether the selected install builds through MSBuild.
    pub fn uses_msbuild(&self) -> bool {
        self.generation.uses_msbuild()
    }

    /// Solution generated for `project`.
    pub fn solution(project: &Path) -> PathBuf {
        project.with_extension(Self::SOLUTION_EXTENSION)
    }

    /// Up-to-date project count from devenv's summary line.
    pub fn up_to_date_count(stdout: &str) -> Option<u32> {
        UP_TO_DATE_RE
            .captures(stdout)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Arguments for a build of `target`.
    pub fn build_args(
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
    ) -> Vec<String> {
        let mut args = opts.arguments.clone();
        args.push(Self::solution(project).to_string_lossy().into_owned());
        args.push(if opts.rebuild { "/Rebuild" } else { "/Build" }.to_string());
        args.push(env.configuration.buildname().to_string());

        // devenv has no "all" verb; a solution build covers every project.
        if let Target::Named(name) = target {
            args.push("/Project".to_string());
            args.push(name.clone());
        }

        if let Some(config) = env.configuration.as_deref() {
            args.push("/ProjectConfig".to_string());
            args.push(config.to_string());
        }

        args
    }
}

impl BackendShim for MsvsShim {
    fn format(&self) -> Format {
        Format::Msvs
    }

    fn tool(&self) -> &ToolResolution {
        &self.tool
    }

    fn tool_name(&self) -> &'static str {
        "devenv"
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
        _target: &Target,
        invocation: Invocation,
    ) -> Result<Invocation, VerifyError> {
        match Self::up_to_date_count(&invocation.stdout) {
            Some(Self::EXPECTED_UP_TO_DATE) => Ok(invocation),
            count => {
                tracing::debug!("up-to-date count {:?}, expected {}", count, Self::EXPECTED_UP_TO_DATE);
                Err(invocation.not_up_to_date(self.format()))
            }
        }
    }

    fn built_file_path(&self, env: &BuildEnv<'_>, artifact: &ArtifactSpec) -> PathBuf {
        // The libdir override is make-only.
        let mut dirs = vec![env.configuration.dirname()];
        if artifact.kind == ArtifactKind::StaticLib {
            dirs.push(Self::STATIC_LIBDIR);
        }
        env.output_path(artifact, &dirs)
    }

    fn library_path(&self, _env: &BuildEnv<'_>) -> Option<LibraryPath> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::ToolLocator;
    use crate::builder::util::Affixes;
    use crate::core::configuration::Configuration;
    use crate::core::target::RunOptions;
    use crate::test_support::{MockExecutor, MockProcessOutput};

    const SUMMARY_ONE: &str =
        "Build started\r\n========== Build: 0 succeeded, 0 failed, 1 up-to-date, 0 skipped ==========\r\n";

    fn shim() -> MsvsShim {
        MsvsShim {
            tool: ToolResolution::Found {
                path: PathBuf::from("C:\\VS\\devenv.com"),
            },
            generation: MsvsGeneration::MsBuild,
        }
    }

    fn env<'a>(
        workdir: &'a Path,
        config: &'a Configuration,
        exec: &'a MockExecutor,
    ) -> BuildEnv<'a> {
        BuildEnv {
            workdir,
            configuration: config,
            executor: exec,
            affixes: &Affixes::WINDOWS,
        }
    }

    #[test]
    fn test_up_to_date_count() {
        assert_eq!(MsvsShim::up_to_date_count(SUMMARY_ONE), Some(1));
        assert_eq!(
            MsvsShim::up_to_date_count("=== Build: 0 succeeded, 0 failed, 3 up-to-date, 0 skipped ===\n"),
            Some(3)
        );
        assert_eq!(
            MsvsShim::up_to_date_count("=== Build: 1 succeeded, 0 failed, 0 up-to-date, 0 skipped ===\n"),
            None
        );
    }

    #[test]
    fn test_build_args_default() {
        let exec = MockExecutor::new();
        let config = Configuration::default();
        let env = env(Path::new("/work"), &config, &exec);

        let args = MsvsShim::build_args(&env, Path::new("hello.gyp"), &Target::All, &BuildOptions::new());
        assert_eq!(args, vec!["hello.sln", "/Build", "Default"]);
    }

    #[test]
    fn test_build_args_named_target_and_config() {
        let exec = MockExecutor::new();
        let config = Configuration::named("Release|x64");
        let env = env(Path::new("/work"), &config, &exec);
        let opts = BuildOptions::new().with_rebuild(true);

        let args = MsvsShim::build_args(&env, Path::new("hello.gyp"), &Target::named("prog"), &opts);
        assert_eq!(
            args,
            vec![
                "hello.sln",
                "/Rebuild",
                "Release|x64",
                "/Project",
                "prog",
                "/ProjectConfig",
                "Release|x64"
            ]
        );
    }

    #[test]
    fn test_up_to_date_requires_single_project() {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(SUMMARY_ONE));
        let config = Configuration::default();
        let env = env(Path::new("/work"), &config, &exec);

        assert!(shim()
            .up_to_date(&env, Path::new("hello.gyp"), &Target::Default, &BuildOptions::new())
            .is_ok());

        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(
            "========== Build: 0 succeeded, 0 failed, 2 up-to-date, 0 skipped ==========\n",
        ));
        let env = BuildEnv {
            executor: &exec,
            ..env
        };
        let err = shim()
            .up_to_date(&env, Path::new("hello.gyp"), &Target::Default, &BuildOptions::new())
            .unwrap_err();
        assert!(err.is_not_up_to_date());
    }

    #[test]
    fn test_up_to_date_missing_summary() {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success("Compiling...\n"));
        let config = Configuration::default();
        let env = env(Path::new("/work"), &config, &exec);

        let err = shim()
            .up_to_date(&env, Path::new("hello.gyp"), &Target::Default, &BuildOptions::new())
            .unwrap_err();
        assert!(err.is_not_up_to_date());
    }

    #[test]
    fn test_built_file_paths() {
        let exec = MockExecutor::new();
        let config = Configuration::named("Debug|Win32");
        let env = env(Path::new("/work"), &config, &exec);
        let msvs = shim();

        assert_eq!(
            msvs.built_file_path(&env, &ArtifactSpec::executable("prog")),
            PathBuf::from("/work/Debug/prog.exe")
        );
        assert_eq!(
            msvs.built_file_path(&env, &ArtifactSpec::static_lib("a")),
            PathBuf::from("/work/Debug/lib/a.lib")
        );
        assert_eq!(
            msvs.built_file_path(&env, &ArtifactSpec::shared_lib("b")),
            PathBuf::from("/work/Debug/b.dll")
        );
    }

    #[test]
    fn test_built_file_path_ignores_libdir() {
        let exec = MockExecutor::new();
        let config = Configuration::default();
        let env = env(Path::new("/work"), &config, &exec);

        assert_eq!(
            shim().built_file_path(&env, &ArtifactSpec::static_lib("a").with_libdir("obj.host")),
            PathBuf::from("/work/Default/lib/a.lib")
        );
        assert_eq!(
            shim().built_file_path(&env, &ArtifactSpec::shared_lib("b").with_libdir("lib.host")),
            PathBuf::from("/work/Default/b.dll")
        );
    }

    #[test]
    fn test_run_sets_no_library_path() {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success("hi\n"));
        let config = Configuration::default();
        let env = env(Path::new("/work"), &config, &exec);

        shim()
            .run_built_executable(&env, "hello", &RunOptions::new())
            .unwrap();
        assert!(exec.last_env().unwrap().is_empty());
    }

    #[test]
    fn test_construction_fails_without_devenv() {
        let roots = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let locator = ToolLocator::with_search_path(bin.path());
        let discovery =
            DevenvDiscovery::new(&locator).with_roots(vec![roots.path().to_path_buf()]);

        match MsvsShim::new(&discovery) {
            Err(VerifyError::ToolNotFound { format, searched, .. }) => {
                assert_eq!(format, Format::Msvs);
                assert!(!searched.is_empty());
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected construction to fail"),
        }
    }
}
