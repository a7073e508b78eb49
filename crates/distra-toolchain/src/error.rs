//! Error types for toolchain and shell invocations.

/// Errors that can occur while running external programs.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The program could not be found.
    #[error(
        "the {program} executable is either not installed or not on your path; \
         in order to use this tool, please install {program} or add it to your path"
    )]
    NotInstalled {
        /// The program that was looked up.
        program: String,
    },

    /// The program wrote to standard error.
    #[error("{stderr}")]
    Stderr {
        /// The program that was run.
        program: String,
        /// Captured standard error, verbatim.
        stderr: String,
    },

    /// The program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that was run.
        program: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The catalog listing or platforms file was invalid.
    #[error(transparent)]
    Catalog(#[from] distra_core::DistraError),

    /// I/O error handling the script file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
