//! Error types for catalog, selection, and manifest operations.

use std::path::PathBuf;

/// Errors that can occur while parsing versions, catalogs, and selections.
#[derive(Debug, thiserror::Error)]
pub enum DistraError {
    /// Version string did not split into three components.
    #[error("invalid version number, expected [major].[minor].[subminor]")]
    VersionShape,

    /// A version component was blank.
    #[error("{component} version is empty")]
    EmptyVersionComponent {
        /// Which component: major, minor, or subminor.
        component: &'static str,
    },

    /// A version component was not a non-negative integer.
    #[error("{component} is '{value}' instead of a number")]
    NonNumericVersionComponent {
        /// Which component: major, minor, or subminor.
        component: &'static str,
        /// The offending text.
        value: String,
    },

    /// A platform listing line was not of the form `os/arch`.
    #[error("error on line {line}: '{text}' is an invalid [os]/[arch] pairing")]
    MalformedPlatformLine {
        /// 1-based line number.
        line: usize,
        /// The trimmed line text.
        text: String,
    },

    /// An operating system is not present in the catalog.
    #[error("unknown operating system '{os}'")]
    UnknownOperatingSystem {
        /// The requested operating system.
        os: String,
    },

    /// An architecture is not listed for the operating system.
    #[error("invalid architecture for operating system '{os}'")]
    InvalidArchitecture {
        /// The operating system the architecture was requested for.
        os: String,
        /// The rejected architecture.
        arch: String,
    },

    /// I/O error reading or writing a manifest.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, DistraError>;
