//! Configuration file support for gyptest.
//!
//! gyptest reads two configuration file locations:
//! - Global: `<config dir>/gyptest/config.toml` - User-wide defaults
//! - Project: `.gyptest/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and the
//! `TESTGYP_FORMAT`, `TESTGYP_GYP` and `GYP_MSVS_VERSION` environment
//! variables take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::builder::errors::VerifyError;
use crate::builder::toolchain::MSVS_VERSION_ENV;
use crate::core::format::{Format, FormatParseError, FORMAT_ENV};

/// Environment variable naming the generator to run.
pub const GENERATOR_ENV: &str = "TESTGYP_GYP";

/// Directory holding project-level configuration.
pub const PROJECT_CONFIG_DIR: &str = ".gyptest";

/// Configuration file name, in both locations.
pub const CONFIG_FILE: &str = "config.toml";

/// gyptest configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    pub format: Option<String>,

    /// Generator executable
    pub generator: Option<PathBuf>,

    /// Initial build configuration
    pub configuration: Option<String>,

    /// Explicit build tool paths
    pub tools: ToolsConfig,

    /// Visual Studio discovery settings
    pub msvs: MsvsConfig,
}

/// Explicit build tool paths, tried before the built-in candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub make: Option<PathBuf>,
    pub scons: Option<PathBuf>,
    pub xcodebuild: Option<PathBuf>,
    pub devenv: Option<PathBuf>,
}

/// Visual Studio discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsvsConfig {
    /// Pinned release, e.g. "2010"
    pub version: Option<String>,

    /// Install roots searched for pinned or probed releases
    pub roots: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.generator.is_some() {
            self.generator = other.generator;
        }
        if other.configuration.is_some() {
            self.configuration = other.configuration;
        }

        if other.tools.make.is_some() {
            self.tools.make = other.tools.make;
        }
        if other.tools.scons.is_some() {
            self.tools.scons = other.tools.scons;
        }
        if other.tools.xcodebuild.is_some() {
            self.tools.xcodebuild = other.tools.xcodebuild;
        }
        if other.tools.devenv.is_some() {
            self.tools.devenv = other.tools.devenv;
        }

        if other.msvs.version.is_some() {
            self.msvs.version = other.msvs.version;
        }
        // Roots replace rather than extend.
        if !other.msvs.roots.is_empty() {
            self.msvs.roots = other.msvs.roots;
        }
    }

    /// Apply environment overrides. Empty values are ignored.
    pub fn apply_env(&mut self) {
        if let Some(format) = env_value(FORMAT_ENV) {
            self.format = Some(format);
        }
        if let Some(generator) = env_value(GENERATOR_ENV) {
            self.generator = Some(PathBuf::from(generator));
        }
        if let Some(version) = env_value(MSVS_VERSION_ENV) {
            self.msvs.version = Some(version);
        }
    }

    /// Parse the configured format, if any.
    pub fn format(&self) -> Option<Result<Format, FormatParseError>> {
        self.format.as_deref().map(str::parse)
    }

    /// Explicit tool path configured for a format.
    pub fn tool_for(&self, format: Format) -> Option<&Path> {
        match format {
            Format::Gypd => None,
            Format::Make => self.tools.make.as_deref(),
            Format::Msvs => self.tools.devenv.as_deref(),
            Format::Scons => self.tools.scons.as_deref(),
            Format::Xcode => self.tools.xcodebuild.as_deref(),
        }
    }

    /// Load a file, reporting parse errors against its path.
    pub fn load_checked(path: &Path) -> Result<Self, VerifyError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| VerifyError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load every layer for a scenario run from `project_root`.
    ///
    /// A broken global file is only warned about; a broken project file
    /// is an error.
    pub fn discover(project_root: &Path) -> Result<Self, VerifyError> {
        let mut config = load_config(
            global_config_path().as_deref(),
            &project_config_path(project_root),
        )?;
        config.apply_env();
        Ok(config)
    }
}

/// Value of an environment variable, treating empty as unset.
pub fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.gyptest/config.toml)
/// 2. Global config (<config dir>/gyptest/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config, VerifyError> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_checked(project_path)?);
    }

    Ok(config)
}

/// Get the global gyptest config path.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gyptest").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Get the project config path (.gyptest/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE)
}
