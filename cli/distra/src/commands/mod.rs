//! CLI command implementations.

pub mod build;
pub mod distrafile;
pub mod list;
