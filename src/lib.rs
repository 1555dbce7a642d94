//! gyptest - multi-backend build verification for gyp
//!
//! This crate checks that a project generator writes build files each
//! native build tool can consume, and that builds through those tools
//! behave: a repeat build must do nothing, and built artifacts must land
//! where the backend's layout says they do.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for gyptest unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock process executor and fixture trees.
#[cfg(test)]
pub mod test_support;

pub use builder::{Backend, BackendShim, Invocation, ToolLocator, ToolResolution, VerifyError};
pub use core::{
    ArtifactKind, ArtifactSpec, BuildOptions, Configuration, Format, FormatFilter, RunOptions,
    SymRoot, Target,
};
pub use ops::{Scenario, ScenarioBuilder};
pub use util::Config;
