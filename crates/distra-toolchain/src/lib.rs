//! Toolchain discovery and build script execution for Distra.
//!
//! Everything here shells out: the platform-list command that seeds the
//! catalog, and the generated build script. Standard error output from
//! either is treated as a failure.

pub mod error;
pub mod process;
pub mod script_file;
pub mod source;

pub use error::{Result, ToolchainError};
pub use process::run_captured;
pub use script_file::ScriptFile;
pub use source::PlatformSource;
