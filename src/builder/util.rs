//! Shared utilities for the builder module.

use crate::core::target::ArtifactKind;

/// Platform file-name affixes for built artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affixes {
    /// Executable suffix (`.exe` on Windows)
    pub exe_suffix: &'static str,
    /// Static library prefix
    pub lib_prefix: &'static str,
    /// Static library suffix
    pub lib_suffix: &'static str,
    /// Shared library prefix
    pub dll_prefix: &'static str,
    /// Shared library suffix
    pub dll_suffix: &'static str,
}

impl Affixes {
    /// Windows naming: `foo.exe`, `foo.lib`, `foo.dll`.
    pub const WINDOWS: Affixes = Affixes {
        exe_suffix: ".exe",
        lib_prefix: "",
        lib_suffix: ".lib",
        dll_prefix: "",
        dll_suffix: ".dll",
    };

    /// macOS naming: `foo`, `libfoo.a`, `libfoo.dylib`.
    pub const MACOS: Affixes = Affixes {
        exe_suffix: "",
        lib_prefix: "lib",
        lib_suffix: ".a",
        dll_prefix: "lib",
        dll_suffix: ".dylib",
    };

    /// Other Unix naming: `foo`, `libfoo.a`, `libfoo.so`.
    pub const UNIX: Affixes = Affixes {
        exe_suffix: "",
        lib_prefix: "lib",
        lib_suffix: ".a",
        dll_prefix: "lib",
        dll_suffix: ".so",
    };

    /// Affixes for the host platform.
    pub fn host() -> Affixes {
        if cfg!(windows) {
            Affixes::WINDOWS
        } else if cfg!(target_os = "macos") {
            Affixes::MACOS
        } else {
            Affixes::UNIX
        }
    }

    /// File name for an artifact, with affixes unless `bare` is set.
    pub fn basename(&self, name: &str, kind: ArtifactKind, bare: bool) -> String {
        if bare {
            return name.to_string();
        }
        match kind {
            ArtifactKind::Executable => format!("{}{}", name, self.exe_suffix),
            ArtifactKind::StaticLib => format!("{}{}{}", self.lib_prefix, name, self.lib_suffix),
            ArtifactKind::SharedLib => format!("{}{}{}", self.dll_prefix, name, self.dll_suffix),
            ArtifactKind::Unspecified => name.to_string(),
        }
    }
}

impl Default for Affixes {
    fn default() -> Self {
        Affixes::host()
    }
}

/// File name for an artifact on the host platform.
pub fn built_file_basename(name: &str, kind: ArtifactKind, bare: bool) -> String {
    Affixes::host().basename(name, kind, bare)
}
