//! Xcode backend shim - drives generated projects with xcodebuild.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::builder::errors::VerifyError;
use crate::builder::shim::trait_def::{BackendShim, BuildEnv, Invocation, LibraryPath};
use crate::builder::toolchain::{ToolLocator, ToolResolution};
use crate::core::format::Format;
use crate::core::target::{ArtifactSpec, BuildOptions, Target};
use crate::util::process::ProcessBuilder;

/// Output that can appear in an otherwise no-op build, applied in order.
static NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Script phases run on every build; their banners carry hashed names.
        concat!(
            r"\nPhaseScriptExecution /\S+/Script-[0-9A-F]+\.sh\n",
            r"    cd /\S+\n",
            r"    /bin/sh -c /\S+/Script-[0-9A-F]+\.sh\n",
            r"(make: Nothing to be done for `all'\.\n)?",
        ),
        // distcc pump shutdown can land anywhere in the output.
        r"__________Shutting down distcc-pump include server\n",
    ]
    .iter()
    .map(|re| Regex::new(re).expect("valid regex"))
    .collect()
});

/// Xcode backend shim.
pub struct XcodeShim {
    tool: ToolResolution,
}

impl XcodeShim {
    /// Driver candidates, in preference order.
    pub const TOOL_CANDIDATES: &'static [&'static str] = &["xcodebuild"];

    /// Project bundle extension.
    pub const PROJECT_EXTENSION: &'static str = "xcodeproj";

    /// Output directory below the run directory.
    pub const BUILD_DIR: &'static str = "build";

    /// Endings of a no-op build, one per xcodebuild generation.
    pub const UP_TO_DATE_ENDINGS: &'static [&'static str] = &[
        "Checking Dependencies...\n** BUILD SUCCEEDED **\n",
        "Check dependencies\n** BUILD SUCCEEDED **\n\n",
    ];

    /// Resolve `xcodebuild`, with an optional configured path tried first.
    pub fn new(locator: &ToolLocator, explicit: Option<&Path>) -> Self {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(path) = explicit {
            candidates.push(path.to_string_lossy().into_owned());
        }
        candidates.extend(Self::TOOL_CANDIDATES.iter().map(|s| s.to_string()));

        XcodeShim {
            tool: locator.locate(&candidates),
        }
    }

    /// Project bundle generated for `project`.
    pub fn project_bundle(project: &Path) -> PathBuf {
        project.with_extension(Self::PROJECT_EXTENSION)
    }

    /// Remove output that does not indicate work.
    pub fn strip_noise(stdout: &str) -> String {
        NOISE
            .iter()
            .fold(stdout.to_string(), |out, re| re.replace_all(&out, "").into_owned())
    }

    /// Whether build output, once cleaned, reports a no-op build.
    pub fn is_up_to_date_output(stdout: &str) -> bool {
        let cleaned = Self::strip_noise(stdout);
        Self::UP_TO_DATE_ENDINGS
            .iter()
            .any(|ending| cleaned.ends_with(ending))
    }

    /// Arguments for a build of `target`.
    pub fn build_args(
        env: &BuildEnv<'_>,
        project: &Path,
        target: &Target,
        opts: &BuildOptions,
    ) -> Vec<String> {
        let mut args = opts.arguments.clone();
        args.push("-project".to_string());
        args.push(Self::project_bundle(project).to_string_lossy().into_owned());

        match target {
            Target::Default => {}
            Target::All => args.push("-alltargets".to_string()),
            Target::Named(name) => {
                args.push("-target".to_string());
                args.push(name.clone());
            }
        }

        if let Some(config) = env.configuration.as_deref() {
            args.push("-configuration".to_string());
            args.push(config.to_string());
        }

        if let Some(symroot) = opts.symroot.value() {
            args.push(format!("SYMROOT={}", symroot));
        }

        args
    }
}

impl BackendShim for XcodeShim {
    fn format(&self) -> Format {
        Format::Xcode
    }

    fn tool(&self) -> &ToolResolution {
        &self.tool
    }

    fn tool_name(&self) -> &'static str {
        "xcodebuild"
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
        if Self::is_up_to_date_output(&invocation.stdout) {
            Ok(invocation)
        } else {
            Err(invocation.not_up_to_date(self.format()))
        }
    }

    fn built_file_path(&self, env: &BuildEnv<'_>, artifact: &ArtifactSpec) -> PathBuf {
        env.output_path(artifact, &[Self::BUILD_DIR, env.configuration.dirname()])
    }

    fn library_path(&self, env: &BuildEnv<'_>) -> Option<LibraryPath> {
        let dir = Path::new(Self::BUILD_DIR).join(env.configuration.dirname());
        Some(LibraryPath {
            var: "DYLD_LIBRARY_PATH",
            value: dir.to_string_lossy().into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::util::Affixes;
    use crate::core::configuration::Configuration;
    use crate::core::target::{RunOptions, SymRoot};
    use crate::test_support::{MockExecutor, MockProcessOutput};

    const SCRIPT_PHASE: &str = "\nPhaseScriptExecution /Users/me/build/hello.build/Script-0A1B2C3D.sh\n    cd /Users/me/src\n    /bin/sh -c /Users/me/build/hello.build/Script-0A1B2C3D.sh\nmake: Nothing to be done for `all'.\n";

    fn shim() -> XcodeShim {
        XcodeShim {
            tool: ToolResolution::Found {
                path: PathBuf::from("/usr/bin/xcodebuild"),
            },
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
            affixes: &Affixes::MACOS,
        }
    }

    #[test]
    fn test_up_to_date_endings() {
        assert!(XcodeShim::is_up_to_date_output(
            "=== BUILD NATIVE TARGET hello ===\nChecking Dependencies...\n** BUILD SUCCEEDED **\n"
        ));
        assert!(XcodeShim::is_up_to_date_output(
            "Check dependencies\n** BUILD SUCCEEDED **\n\n"
        ));
        assert!(!XcodeShim::is_up_to_date_output(
            "CompileC hello.o hello.c\n** BUILD SUCCEEDED **\n"
        ));
    }

    #[test]
    fn test_noise_is_stripped() {
        let stdout = format!(
            "Checking Dependencies...{}\n** BUILD SUCCEEDED **\n__________Shutting down distcc-pump include server\n",
            SCRIPT_PHASE
        );
        assert_eq!(
            XcodeShim::strip_noise(&stdout),
            "Checking Dependencies...\n** BUILD SUCCEEDED **\n"
        );
        assert!(XcodeShim::is_up_to_date_output(&stdout));
    }

    #[test]
    fn test_build_args() {
        let exec = MockExecutor::new();
        let config = Configuration::named("Release");
        let env = env(Path::new("/work"), &config, &exec);

        let args = XcodeShim::build_args(&env, Path::new("hello.gyp"), &Target::All, &BuildOptions::new());
        assert_eq!(
            args,
            vec![
                "-project",
                "hello.xcodeproj",
                "-alltargets",
                "-configuration",
                "Release",
                "SYMROOT=$SRCROOT/build"
            ]
        );

        let opts = BuildOptions::new().with_symroot(SymRoot::from_value(""));
        let args = XcodeShim::build_args(&env, Path::new("hello.gyp"), &Target::named("prog"), &opts);
        assert_eq!(
            args,
            vec!["-project", "hello.xcodeproj", "-target", "prog", "-configuration", "Release"]
        );
    }

    #[test]
    fn test_up_to_date_rejects_work() {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(
            "CompileC build/hello.o hello.c\n** BUILD SUCCEEDED **\n",
        ));
        let config = Configuration::default();
        let env = env(Path::new("/work"), &config, &exec);

        let err = shim()
            .up_to_date(&env, Path::new("hello.gyp"), &Target::Default, &BuildOptions::new())
            .unwrap_err();
        assert!(err.is_not_up_to_date());
    }

    #[test]
    fn test_up_to_date_build_failure() {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::with_output(
            65,
            "** BUILD FAILED **\n",
            "error: no such file\n",
        ));
        let config = Configuration::default();
        let env = env(Path::new("/work"), &config, &exec);

        let err = shim()
            .up_to_date(&env, Path::new("hello.gyp"), &Target::Default, &BuildOptions::new())
            .unwrap_err();
        assert!(matches!(err, VerifyError::CommandFailed { status: Some(65), .. }));
    }

    #[test]
    fn test_built_file_path_and_library_path() {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));
        let config = Configuration::named("Debug");
        let env = env(Path::new("/work"), &config, &exec);
        let xcode = shim();

        assert_eq!(
            xcode.built_file_path(&env, &ArtifactSpec::shared_lib("b")),
            PathBuf::from("/work/build/Debug/libb.dylib")
        );

        xcode
            .run_built_executable(&env, "prog", &RunOptions::new().with_chdir("sub"))
            .unwrap();
        assert_eq!(exec.calls(), vec!["/work/sub/build/Debug/prog"]);
        assert_eq!(
            exec.last_env().unwrap().get("DYLD_LIBRARY_PATH").map(String::as_str),
            Some("build/Debug")
        );
    }
}
