//! Visual Studio (`devenv.com`) discovery.
//!
//! `devenv.com` must be used rather than `devenv.exe`: only the console
//! driver writes build output to stdout.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{ToolLocator, ToolResolution};

/// Environment variable pinning the Visual Studio version to use.
pub const MSVS_VERSION_ENV: &str = "GYP_MSVS_VERSION";

/// Console driver name searched on the search path.
pub const DEVENV: &str = "devenv.com";

/// Default install roots searched for pinned or probed versions.
pub const DEFAULT_ROOTS: &[&str] = &["C:\\Program Files (x86)", "C:\\Program Files"];

/// Which project/build engine generation a Visual Studio release uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MsvsGeneration {
    /// 2008 and earlier: `.vcproj` projects built by devenv itself
    Legacy,
    /// 2010 and later: `.vcxproj` projects built through MSBuild
    MsBuild,
}

impl MsvsGeneration {
    /// Generation for a release year.
    pub fn for_year(year: u16) -> Self {
        if year >= 2010 {
            MsvsGeneration::MsBuild
        } else {
            MsvsGeneration::Legacy
        }
    }

    /// Whether builds go through MSBuild.
    pub fn uses_msbuild(&self) -> bool {
        matches!(self, MsvsGeneration::MsBuild)
    }
}

impl std::fmt::Display for MsvsGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MsvsGeneration::Legacy => write!(f, "legacy (devenv)"),
            MsvsGeneration::MsBuild => write!(f, "msbuild"),
        }
    }
}

/// A known Visual Studio release and where it installs `devenv.com`.
#[derive(Debug, Clone, Copy)]
pub struct MsvsInstall {
    /// Release name as used by `GYP_MSVS_VERSION`
    pub version: &'static str,
    /// Release year
    pub year: u16,
    /// Path components below an install root
    pub relative: &'static [&'static str],
}

impl MsvsInstall {
    /// Path of `devenv.com` below the given root.
    pub fn path_under(&self, root: &Path) -> PathBuf {
        self.relative
            .iter()
            .fold(root.to_path_buf(), |path, part| path.join(part))
    }

    /// Relative install path joined with the platform separator.
    pub fn relative_path(&self) -> PathBuf {
        self.relative.iter().collect()
    }

    /// Build engine generation of this release.
    pub fn generation(&self) -> MsvsGeneration {
        MsvsGeneration::for_year(self.year)
    }
}

/// Known releases, newest first.
pub const KNOWN_INSTALLS: &[MsvsInstall] = &[
    MsvsInstall {
        version: "2013",
        year: 2013,
        relative: &["Microsoft Visual Studio 12.0", "Common7", "IDE", DEVENV],
    },
    MsvsInstall {
        version: "2012",
        year: 2012,
        relative: &["Microsoft Visual Studio 11.0", "Common7", "IDE", DEVENV],
    },
    MsvsInstall {
        version: "2010",
        year: 2010,
        relative: &["Microsoft Visual Studio 10.0", "Common7", "IDE", DEVENV],
    },
    MsvsInstall {
        version: "2008",
        year: 2008,
        relative: &["Microsoft Visual Studio 9.0", "Common7", "IDE", DEVENV],
    },
    MsvsInstall {
        version: "2005",
        year: 2005,
        relative: &["Microsoft Visual Studio 8", "Common7", "IDE", DEVENV],
    },
];

/// Look up a known release by name.
pub fn known_install(version: &str) -> Option<&'static MsvsInstall> {
    KNOWN_INSTALLS.iter().find(|i| i.version == version)
}

/// Outcome of devenv discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevenvSelection {
    /// How the driver was resolved
    pub resolution: ToolResolution,
    /// Inferred build engine generation
    pub generation: MsvsGeneration,
}

/// Resolves `devenv.com` from a pinned version, the search path, or
/// well-known install locations, in that order.
#[derive(Debug, Clone)]
pub struct DevenvDiscovery<'a> {
    locator: &'a ToolLocator,
    roots: Vec<PathBuf>,
    requested_version: Option<String>,
    explicit_tool: Option<PathBuf>,
}

impl<'a> DevenvDiscovery<'a> {
    /// Create a discovery over the default install roots.
    pub fn new(locator: &'a ToolLocator) -> Self {
        DevenvDiscovery {
            locator,
            roots: DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
            requested_version: None,
            explicit_tool: None,
        }
    }

    /// Replace the install roots (an empty list keeps the defaults).
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        if !roots.is_empty() {
            self.roots = roots;
        }
        self
    }

    /// Pin a version (`auto` or an unknown version leaves it unpinned).
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.requested_version = version;
        self
    }

    /// Use an explicitly configured driver as the search-path result.
    pub fn with_explicit_tool(mut self, tool: Option<PathBuf>) -> Self {
        self.explicit_tool = tool;
        self
    }

    /// Paths this discovery looks at, for error reports.
    pub fn searched(&self) -> Vec<PathBuf> {
        let mut searched = vec![PathBuf::from(DEVENV)];
        for install in KNOWN_INSTALLS {
            for root in &self.roots {
                searched.push(install.path_under(root));
            }
        }
        searched
    }

    fn find_under_roots(&self, install: &MsvsInstall) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| install.path_under(root))
            .find(|path| path.exists())
    }

    /// Run discovery. `NotFound` means no driver exists anywhere.
    pub fn discover(&self) -> DevenvSelection {
        let generic = self
            .explicit_tool
            .clone()
            .or_else(|| self.locator.find(DEVENV));

        if let Some(version) = self.requested_version.as_deref() {
            if let Some(install) = known_install(version) {
                if let Some(path) = self.find_under_roots(install) {
                    tracing::debug!("Using pinned Visual Studio {} at {}", version, path.display());
                    return DevenvSelection {
                        resolution: ToolResolution::Pinned {
                            path,
                            version: version.to_string(),
                        },
                        generation: install.generation(),
                    };
                }
                tracing::warn!(
                    "{} specifies \"{}\" but corresponding \"{}\" was not found",
                    MSVS_VERSION_ENV,
                    version,
                    install.relative_path().display()
                );
            }
        }

        if let Some(path) = generic {
            let generation = infer_generation(&path);
            tracing::debug!(
                "Using {} from search path ({:?} generation)",
                path.display(),
                generation
            );
            return DevenvSelection {
                resolution: ToolResolution::Found { path },
                generation,
            };
        }

        for install in KNOWN_INSTALLS {
            if let Some(path) = self.find_under_roots(install) {
                tracing::debug!(
                    "Found Visual Studio {} at {}",
                    install.version,
                    path.display()
                );
                return DevenvSelection {
                    resolution: ToolResolution::Probed {
                        path,
                        version: install.version.to_string(),
                    },
                    generation: install.generation(),
                };
            }
        }

        DevenvSelection {
            resolution: ToolResolution::NotFound,
            generation: MsvsGeneration::Legacy,
        }
    }
}

/// Guess the generation of a driver from its install path.
///
/// Unrecognized locations are assumed to be the legacy generation.
pub fn infer_generation(tool: &Path) -> MsvsGeneration {
    let tool = tool.to_string_lossy();
    KNOWN_INSTALLS
        .iter()
        .find(|install| {
            let fragment = install.relative_path();
            tool.contains(fragment.to_string_lossy().as_ref())
        })
        .map(|install| install.generation())
        .unwrap_or(MsvsGeneration::Legacy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::tests::make_tool;

    fn install_at(root: &Path, version: &str) -> PathBuf {
        let install = known_install(version).unwrap();
        let path = install.path_under(root);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_generation_for_year() {
        assert_eq!(MsvsGeneration::for_year(2008), MsvsGeneration::Legacy);
        assert_eq!(MsvsGeneration::for_year(2010), MsvsGeneration::MsBuild);
        assert!(MsvsGeneration::for_year(2013).uses_msbuild());
    }

    #[test]
    fn test_pinned_version_wins() {
        let roots = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let pinned = install_at(roots.path(), "2008");
        let locator = ToolLocator::with_search_path(bin.path());

        let selection = DevenvDiscovery::new(&locator)
            .with_roots(vec![roots.path().to_path_buf()])
            .with_version(Some("2008".to_string()))
            .discover();

        assert_eq!(
            selection.resolution,
            ToolResolution::Pinned {
                path: pinned,
                version: "2008".to_string()
            }
        );
        assert_eq!(selection.generation, MsvsGeneration::Legacy);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_pinned_falls_through_to_search_path() {
        let roots = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let devenv = make_tool(bin.path(), DEVENV);
        let locator = ToolLocator::with_search_path(bin.path());

        let selection = DevenvDiscovery::new(&locator)
            .with_roots(vec![roots.path().to_path_buf()])
            .with_version(Some("2010".to_string()))
            .discover();

        assert_eq!(selection.resolution, ToolResolution::Found { path: devenv });
        assert_eq!(selection.generation, MsvsGeneration::Legacy);
    }

    #[test]
    fn test_explicit_tool_generation_inferred_from_path() {
        let roots = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let tool = known_install("2010").unwrap().path_under(Path::new("/opt/vs"));
        let locator = ToolLocator::with_search_path(bin.path());

        let selection = DevenvDiscovery::new(&locator)
            .with_roots(vec![roots.path().to_path_buf()])
            .with_explicit_tool(Some(tool.clone()))
            .discover();

        assert_eq!(selection.resolution, ToolResolution::Found { path: tool });
        assert_eq!(selection.generation, MsvsGeneration::MsBuild);
    }

    #[test]
    fn test_probe_known_installs() {
        let roots = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let path = install_at(roots.path(), "2012");
        let locator = ToolLocator::with_search_path(bin.path());

        let selection = DevenvDiscovery::new(&locator)
            .with_roots(vec![roots.path().to_path_buf()])
            .with_version(Some("auto".to_string()))
            .discover();

        assert_eq!(
            selection.resolution,
            ToolResolution::Probed {
                path,
                version: "2012".to_string()
            }
        );
        assert!(selection.generation.uses_msbuild());
    }

    #[test]
    fn test_nothing_found() {
        let roots = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let locator = ToolLocator::with_search_path(bin.path());

        let discovery =
            DevenvDiscovery::new(&locator).with_roots(vec![roots.path().to_path_buf()]);
        let selection = discovery.discover();

        assert_eq!(selection.resolution, ToolResolution::NotFound);
        assert_eq!(discovery.searched().len(), 1 + KNOWN_INSTALLS.len());
    }

    #[test]
    fn test_infer_generation_unknown_path() {
        assert_eq!(
            infer_generation(Path::new("/usr/local/bin/devenv.com")),
            MsvsGeneration::Legacy
        );
    }
}
