//! High-level operations.
//!
//! Scenarios and the fixture staging they rely on.

pub mod scenario;
pub mod stage;

pub use scenario::{Scenario, ScenarioBuilder, DEFAULT_GENERATOR};
pub use stage::{copy_test_configuration, relocate};
