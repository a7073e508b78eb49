//! Target selection and build script generation for Distra.
//!
//! The pipeline runs leaf-first:
//! - **Catalog:** the toolchain's `os/arch` listing, parsed and validated
//! - **Selection:** requested architectures per OS, checked against the
//!   catalog with `all` wildcards expanded
//! - **Script:** one cross-compile step per resolved target, optionally
//!   followed by a zip step
//! - **Manifest:** a `Distrafile` persisting a target set in listing format
//!
//! [`Version`] compares local and remote releases for the update check.

pub mod catalog;
pub mod error;
pub mod manifest;
pub mod script;
pub mod selection;
pub mod version;

pub use catalog::{ArchitectureListing, Catalog, ALL};
pub use error::{DistraError, Result};
pub use script::{generate, plan, BuildTarget, Compiler, OutputBase, Script, ScriptOptions};
pub use selection::{resolve, resolve_all, ResolvedSelection, Selection};
pub use version::Version;
