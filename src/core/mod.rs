//! Core data types shared by every backend.

pub mod configuration;
pub mod format;
pub mod target;

pub use configuration::{Configuration, DEFAULT_CONFIGURATION};
pub use format::{Format, FormatFilter, FormatParseError, FORMAT_ENV};
pub use target::{ArtifactKind, ArtifactSpec, BuildOptions, RunOptions, SymRoot, Target};
