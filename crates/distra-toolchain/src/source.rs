//! Where the platform catalog comes from.

use std::path::PathBuf;

use distra_core::{manifest, Catalog};

use crate::error::Result;
use crate::process::run_captured;

/// Default platform-list invocation: `go tool dist list`.
pub const DEFAULT_LIST_ARGS: [&str; 3] = ["tool", "dist", "list"];

/// Source of the platform catalog. Live discovery and a platforms file are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSource {
    /// Run the toolchain's platform-list command.
    Toolchain { program: String, args: Vec<String> },
    /// Read a file in `os/arch` listing format.
    File(PathBuf),
}

impl PlatformSource {
    /// The Go toolchain's `go tool dist list`.
    pub fn go() -> Self {
        Self::Toolchain {
            program: "go".into(),
            args: DEFAULT_LIST_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Build the catalog from this source.
    pub fn load(&self) -> Result<Catalog> {
        let listing = match self {
            Self::Toolchain { program, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                run_captured(program, &args)?
            }
            Self::File(path) => manifest::read(path)?,
        };
        let catalog = Catalog::parse(&listing)?;
        log::info!("discovered {} operating systems", catalog.len());
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolchainError;
    use distra_core::DistraError;

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.txt");
        std::fs::write(&path, "linux/amd64\nwindows/arm64\n").unwrap();

        let catalog = PlatformSource::File(path).load().unwrap();
        assert!(catalog.contains_os("linux"));
        assert!(catalog.contains_os("windows"));
    }

    #[test]
    fn malformed_file_is_catalog_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.txt");
        std::fs::write(&path, "linux/amd64\nnot a pair\n").unwrap();

        let err = PlatformSource::File(path).load().unwrap_err();
        assert!(matches!(err, ToolchainError::Catalog(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn leading_blank_lines_keep_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.txt");
        std::fs::write(&path, "\n\nlinux/amd64\nBAD\n").unwrap();

        let err = PlatformSource::File(path).load().unwrap_err();
        assert!(matches!(
            err,
            ToolchainError::Catalog(DistraError::MalformedPlatformLine { line: 4, .. })
        ));
        assert_eq!(
            err.to_string(),
            "error on line 4: 'BAD' is an invalid [os]/[arch] pairing"
        );
    }

    #[cfg(unix)]
    #[test]
    fn load_from_command() {
        let source = PlatformSource::Toolchain {
            program: "sh".into(),
            args: vec!["-c".into(), "printf 'darwin/arm64\\nlinux/386\\n'".into()],
        };
        let catalog = source.load().unwrap();
        assert_eq!(catalog.operating_systems().collect::<Vec<_>>(), ["darwin", "linux"]);
    }

    #[test]
    fn go_source_uses_dist_list() {
        assert_eq!(
            PlatformSource::go(),
            PlatformSource::Toolchain {
                program: "go".into(),
                args: vec!["tool".into(), "dist".into(), "list".into()],
            }
        );
    }
}
