//! Build backends.
//!
//! Tool discovery, the backend contract and its per-format shims.

pub mod errors;
pub mod shim;
pub mod toolchain;
pub mod util;

pub use errors::VerifyError;
pub use shim::{Backend, BackendShim, Invocation};
pub use toolchain::{ToolLocator, ToolResolution};
pub use util::{built_file_basename, Affixes};
