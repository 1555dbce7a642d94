//! Backend shim abstraction.
//!
//! Each native build tool a generator can target gets one shim. A shim
//! knows the tool's argument grammar, how the tool says "nothing to do",
//! and where it puts its outputs. Scenarios talk to every shim through the
//! [`BackendShim`] contract, so they are written once and run against any
//! format.
//!
//! # Architecture
//!
//! ```text
//!                        ┌──────────────┐
//!                        │   Scenario   │
//!                        └──────┬───────┘
//!                               │ Backend::select(format)
//!        ┌──────────┬───────────┼───────────┬───────────┐
//!        ▼          ▼           ▼           ▼           ▼
//!   ┌─────────┐┌─────────┐┌──────────┐┌──────────┐┌──────────┐
//!   │GypdShim ││MakeShim ││ MsvsShim ││SconsShim ││XcodeShim │
//!   └─────────┘└─────────┘└──────────┘└──────────┘└──────────┘
//! ```
//!
//! # Key Concepts
//!
//! - **BackendShim** - The shared contract (in `trait_def.rs`)
//! - **BuildEnv** - Scenario state borrowed for one call (in `trait_def.rs`)
//! - **Backend** - Closed selection over formats (in `registry.rs`)
//!
//! # Usage
//!
//! ```ignore
//! use gyptest::builder::shim::Backend;
//!
//! let backend = Backend::select(Format::Make, &ToolLocator::from_env(), &config)?;
//! backend.as_shim().up_to_date(&env, Path::new("hello.gyp"), &Target::Default, &opts)?;
//! ```

pub mod gypd_shim;
pub mod make_shim;
pub mod msvs_shim;
pub mod registry;
pub mod scons_shim;
pub mod trait_def;
pub mod xcode_shim;

pub use trait_def::{BackendShim, BuildEnv, Invocation, LibraryPath};

pub use registry::{devenv_discovery, get_backend_summaries, Backend, BackendSummary};

pub use gypd_shim::GypdShim;
pub use make_shim::MakeShim;
pub use msvs_shim::MsvsShim;
pub use scons_shim::SconsShim;
pub use xcode_shim::XcodeShim;
