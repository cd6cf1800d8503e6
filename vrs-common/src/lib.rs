//! Shared library for the VibesRails setup tool.
//!
//! The `vrs-setup` binary orchestrates installation; everything with a
//! contract lives here: the idempotent settings patcher, well-known path
//! resolution, scanner discovery, filesystem primitives, and the embedded
//! static assets the installer copies into projects.

pub mod assets;
pub mod discovery;
pub mod errors;
pub mod fs_ops;
pub mod paths;
pub mod settings;

pub use errors::{PatchError, SetupError};
pub use fs_ops::StepOutcome;
pub use settings::PatchOutcome;
