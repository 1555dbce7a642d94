//! Build tool discovery.
//!
//! Every backend names its native driver as an ordered list of candidates.
//! The locator resolves that list once, when the backend is constructed.

pub mod msvc;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use msvc::{DevenvDiscovery, MsvsGeneration, MsvsInstall, KNOWN_INSTALLS, MSVS_VERSION_ENV};

/// How a backend's build tool was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolResolution {
    /// Installed at the location pinned by an explicit version selection
    Pinned { path: PathBuf, version: String },
    /// An absolute candidate, or a bare candidate found on the search path
    Found { path: PathBuf },
    /// Found by probing well-known install locations
    Probed { path: PathBuf, version: String },
    /// Nothing resolved; the first candidate is kept so failures name a tool
    Fallback { name: PathBuf },
    /// No tool at all
    NotFound,
}

impl ToolResolution {
    /// Path to invoke, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ToolResolution::Pinned { path, .. }
            | ToolResolution::Found { path }
            | ToolResolution::Probed { path, .. } => Some(path),
            ToolResolution::Fallback { name } => Some(name),
            ToolResolution::NotFound => None,
        }
    }

    /// Whether the tool was actually located.
    pub fn is_located(&self) -> bool {
        matches!(
            self,
            ToolResolution::Pinned { .. }
                | ToolResolution::Found { .. }
                | ToolResolution::Probed { .. }
        )
    }

    /// Short label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            ToolResolution::Pinned { .. } => "pinned",
            ToolResolution::Found { .. } => "found",
            ToolResolution::Probed { .. } => "probed",
            ToolResolution::Fallback { .. } => "fallback",
            ToolResolution::NotFound => "not found",
        }
    }
}

/// Searches for executables.
///
/// Bare names are looked up on an explicit search path, which defaults to
/// the process `PATH`. Absolute names are used verbatim.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl ToolLocator {
    /// Locator over the process `PATH`.
    pub fn from_env() -> Self {
        ToolLocator {
            search_path: std::env::var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Locator over an explicit search path (same syntax as `PATH`).
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        ToolLocator {
            search_path: Some(search_path.into()),
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Find a single bare executable name on the search path.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        which::which_in(name, Some(search_path), &self.cwd).ok()
    }

    /// Resolve an ordered candidate list.
    ///
    /// The first absolute candidate, or the first bare candidate found on the
    /// search path, wins. When nothing resolves, the first candidate is kept
    /// as a fallback. An empty list resolves to `NotFound`.
    pub fn locate<S: AsRef<str>>(&self, candidates: &[S]) -> ToolResolution {
        for candidate in candidates {
            let candidate = candidate.as_ref();
            if candidate.is_empty() {
                continue;
            }
            if Path::new(candidate).is_absolute() {
                return ToolResolution::Found {
                    path: PathBuf::from(candidate),
                };
            }
            if let Some(path) = self.find(candidate) {
                return ToolResolution::Found { path };
            }
        }

        match candidates.first() {
            Some(first) => {
                let name = PathBuf::from(first.as_ref());
                tracing::warn!(
                    "none of [{}] found on the search path; falling back to `{}`",
                    candidates
                        .iter()
                        .map(|c| c.as_ref())
                        .collect::<Vec<_>>()
                        .join(", "),
                    name.display()
                );
                ToolResolution::Fallback { name }
            }
            None => ToolResolution::NotFound,
        }
    }
}

impl Default for ToolLocator {
    fn default() -> Self {
        Self::from_env()
    }
}
