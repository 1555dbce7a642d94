//! Backend selection.
//!
//! The set of backends is closed: every format maps to exactly one shim,
//! chosen by an exhaustive match. Tool discovery runs once, here.

use std::path::PathBuf;

use serde::Serialize;

use crate::builder::errors::VerifyError;
use crate::builder::shim::gypd_shim::GypdShim;
use crate::builder::shim::make_shim::MakeShim;
use crate::builder::shim::msvs_shim::MsvsShim;
use crate::builder::shim::scons_shim::SconsShim;
use crate::builder::shim::trait_def::BackendShim;
use crate::builder::shim::xcode_shim::XcodeShim;
use crate::builder::toolchain::msvc::{DevenvDiscovery, MsvsGeneration};
use crate::builder::toolchain::{ToolLocator, ToolResolution};
use crate::core::format::Format;
use crate::util::config::Config;

/// A constructed backend, one variant per format.
pub enum Backend {
    Gypd(GypdShim),
    Make(MakeShim),
    Msvs(MsvsShim),
    Scons(SconsShim),
    Xcode(XcodeShim),
}

impl Backend {
    /// Construct the backend for `format`, resolving its tool.
    ///
    /// Only the Visual Studio backend can fail here; the others fall back
    /// to a bare tool name and fail when invoked.
    pub fn select(
        format: Format,
        locator: &ToolLocator,
        config: &Config,
    ) -> Result<Self, VerifyError> {
        let explicit = config.tool_for(format);
        let backend = match format {
            Format::Gypd => Backend::Gypd(GypdShim::new()),
            Format::Make => Backend::Make(MakeShim::new(locator, explicit)),
            Format::Msvs => {
                let discovery = devenv_discovery(locator, config);
                Backend::Msvs(MsvsShim::new(&discovery)?)
            }
            Format::Scons => Backend::Scons(SconsShim::new(locator, explicit)),
            Format::Xcode => Backend::Xcode(XcodeShim::new(locator, explicit)),
        };

        tracing::debug!(
            "Selected {} backend ({}: {})",
            format,
            backend.as_shim().tool_name(),
            backend.as_shim().tool().label()
        );
        Ok(backend)
    }

    /// The backend through the shared contract.
    pub fn as_shim(&self) -> &dyn BackendShim {
        match self {
            Backend::Gypd(shim) => shim,
            Backend::Make(shim) => shim,
            Backend::Msvs(shim) => shim,
            Backend::Scons(shim) => shim,
            Backend::Xcode(shim) => shim,
        }
    }

    /// Format this backend drives.
    pub fn format(&self) -> Format {
        self.as_shim().format()
    }
}

/// Visual Studio discovery configured from `config`.
pub fn devenv_discovery<'a>(locator: &'a ToolLocator, config: &Config) -> DevenvDiscovery<'a> {
    DevenvDiscovery::new(locator)
        .with_roots(config.msvs.roots.clone())
        .with_version(config.msvs.version.clone())
        .with_explicit_tool(config.tool_for(Format::Msvs).map(PathBuf::from))
}

/// Summary of a backend for display purposes.
#[derive(Debug, Clone, Serialize)]
pub struct BackendSummary {
    /// Format name
    pub format: Format,

    /// Brief description
    pub description: &'static str,

    /// Native driver name
    pub tool: &'static str,

    /// How the driver resolved
    pub resolution: ToolResolution,

    /// Visual Studio generation, when one was selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<MsvsGeneration>,
}

impl BackendSummary {
    /// Summarize a constructed backend.
    pub fn from_backend(backend: &Backend) -> Self {
        let shim = backend.as_shim();
        let generation = match backend {
            Backend::Msvs(msvs) => Some(msvs.generation()),
            _ => None,
        };

        BackendSummary {
            format: shim.format(),
            description: shim.format().description(),
            tool: shim.tool_name(),
            resolution: shim.tool().clone(),
            generation,
        }
    }

    /// Whether the backend can run builds.
    pub fn is_available(&self) -> bool {
        self.format == Format::Gypd || self.resolution.is_located()
    }
}

/// Summaries of every backend, in format order.
///
/// A backend that fails construction is reported as not found.
pub fn get_backend_summaries(locator: &ToolLocator, config: &Config) -> Vec<BackendSummary> {
    Format::ALL
        .iter()
        .map(|&format| match Backend::select(format, locator, config) {
            Ok(backend) => BackendSummary::from_backend(&backend),
            Err(e) => {
                tracing::debug!("{} backend unavailable: {}", format, e);
                BackendSummary {
                    format,
                    description: format.description(),
                    tool: "devenv",
                    resolution: ToolResolution::NotFound,
                    generation: None,
                }
            }
        })
        .collect()
}
