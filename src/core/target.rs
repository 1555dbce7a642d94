//! Build targets, artifact descriptors, and per-call options.

use std::path::{Path, PathBuf};

/// What a single build invocation should build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    /// Whatever the build tool builds by default
    #[default]
    Default,
    /// Every target the backend knows about (backend-specific spelling)
    All,
    /// A specific named target
    Named(String),
}

impl Target {
    /// Create a named target.
    pub fn named(name: impl Into<String>) -> Self {
        Target::Named(name.into())
    }

    /// Whether this leaves target selection to the build tool.
    pub fn is_default(&self) -> bool {
        matches!(self, Target::Default)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::named(name)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Default => write!(f, "(default)"),
            Target::All => write!(f, "(all)"),
            Target::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Kind of built artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactKind {
    /// Executable program
    Executable,
    /// Static library
    StaticLib,
    /// Shared/dynamic library
    SharedLib,
    /// Any other file; no affixes are applied
    #[default]
    Unspecified,
}

impl std::str::FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exe" | "executable" => Ok(ArtifactKind::Executable),
            "static" | "staticlib" | "static_library" => Ok(ArtifactKind::StaticLib),
            "shared" | "sharedlib" | "shared_library" | "dylib" => Ok(ArtifactKind::SharedLib),
            "file" | "none" => Ok(ArtifactKind::Unspecified),
            _ => Err(format!(
                "invalid artifact kind '{}'; expected 'exe', 'static', 'shared', or 'file'",
                s
            )),
        }
    }
}

/// Describes a built file to locate.
///
/// Combined with the current configuration, this resolves to exactly one
/// path per backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Platform-independent base name (no prefixes or suffixes)
    pub name: String,

    /// Artifact kind, selects affixes and library subdirectories
    pub kind: ArtifactKind,

    /// Source directory, relative to the workdir, under which output lands
    pub chdir: Option<PathBuf>,

    /// Library subdirectory override (make backend only)
    pub libdir: Option<String>,

    /// Skip platform prefixes and suffixes
    pub bare: bool,
}

impl ArtifactSpec {
    /// Create a descriptor of the given kind.
    pub fn new(name: impl Into<String>, kind: ArtifactKind) -> Self {
        ArtifactSpec {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    /// Describe an executable.
    pub fn executable(name: impl Into<String>) -> Self {
        Self::new(name, ArtifactKind::Executable)
    }

    /// Describe a static library.
    pub fn static_lib(name: impl Into<String>) -> Self {
        Self::new(name, ArtifactKind::StaticLib)
    }

    /// Describe a shared library.
    pub fn shared_lib(name: impl Into<String>) -> Self {
        Self::new(name, ArtifactKind::SharedLib)
    }

    /// Describe a plain file.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, ArtifactKind::Unspecified)
    }

    /// Set the source directory.
    pub fn with_chdir(mut self, chdir: Option<impl Into<PathBuf>>) -> Self {
        self.chdir = chdir.map(Into::into);
        self
    }

    /// Override the library subdirectory.
    pub fn with_libdir(mut self, libdir: impl Into<String>) -> Self {
        self.libdir = Some(libdir.into());
        self
    }

    /// Skip platform affixes.
    pub fn with_bare(mut self, bare: bool) -> Self {
        self.bare = bare;
        self
    }
}

/// Xcode `SYMROOT` handling for a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SymRoot {
    /// `$SRCROOT/build`
    #[default]
    Default,
    /// An explicit value
    Path(String),
    /// Don't pass `SYMROOT=` at all
    Disabled,
}

impl SymRoot {
    /// Default `SYMROOT` value, relative to the project's source root.
    pub const DEFAULT_VALUE: &'static str = "$SRCROOT/build";

    /// Map a raw value, where an empty string disables the setting.
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            SymRoot::Disabled
        } else {
            SymRoot::Path(value)
        }
    }

    /// Value to pass, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            SymRoot::Default => Some(Self::DEFAULT_VALUE),
            SymRoot::Path(path) => Some(path),
            SymRoot::Disabled => None,
        }
    }
}

/// Options for a build invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Subdirectory of the workdir to run in
    pub chdir: Option<PathBuf>,

    /// Extra arguments placed before backend-generated ones
    pub arguments: Vec<String>,

    /// Rebuild instead of build (IDE backend only)
    pub rebuild: bool,

    /// Xcode `SYMROOT` setting
    pub symroot: SymRoot,
}

impl BuildOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run in a subdirectory of the workdir.
    pub fn with_chdir(mut self, chdir: impl Into<PathBuf>) -> Self {
        self.chdir = Some(chdir.into());
        self
    }

    /// Add an extra argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    /// Request a full rebuild.
    pub fn with_rebuild(mut self, rebuild: bool) -> Self {
        self.rebuild = rebuild;
        self
    }

    /// Set the Xcode `SYMROOT`.
    pub fn with_symroot(mut self, symroot: SymRoot) -> Self {
        self.symroot = symroot;
        self
    }

    /// The chdir as a path, if set.
    pub fn chdir(&self) -> Option<&Path> {
        self.chdir.as_deref()
    }
}

/// Options for running a built executable.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Subdirectory of the workdir the executable was built under, also the cwd
    pub chdir: Option<PathBuf>,

    /// Arguments passed to the executable
    pub arguments: Vec<String>,
}

impl RunOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run from a subdirectory of the workdir.
    pub fn with_chdir(mut self, chdir: impl Into<PathBuf>) -> Self {
        self.chdir = Some(chdir.into());
        self
    }

    /// Add arguments for the executable.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_default() {
        assert!(Target::default().is_default());
        assert!(!Target::All.is_default());
        assert_eq!(Target::from("foo"), Target::Named("foo".to_string()));
    }

    #[test]
    fn test_artifact_kind_parse() {
        assert_eq!("exe".parse::<ArtifactKind>().unwrap(), ArtifactKind::Executable);
        assert_eq!("static".parse::<ArtifactKind>().unwrap(), ArtifactKind::StaticLib);
        assert_eq!("shared".parse::<ArtifactKind>().unwrap(), ArtifactKind::SharedLib);
        assert!("bundle".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_symroot_values() {
        assert_eq!(SymRoot::Default.value(), Some("$SRCROOT/build"));
        assert_eq!(SymRoot::from_value("/tmp/sym").value(), Some("/tmp/sym"));
        assert_eq!(SymRoot::from_value(""), SymRoot::Disabled);
        assert_eq!(SymRoot::Disabled.value(), None);
    }

    #[test]
    fn test_artifact_spec_builder() {
        let spec = ArtifactSpec::static_lib("foo")
            .with_chdir(Some("src"))
            .with_libdir("lib.host")
            .with_bare(true);
        assert_eq!(spec.kind, ArtifactKind::StaticLib);
        assert_eq!(spec.chdir.as_deref(), Some(Path::new("src")));
        assert_eq!(spec.libdir.as_deref(), Some("lib.host"));
        assert!(spec.bare);
    }
}
