//! The on-disk build script: written under a random name, then either kept
//! or run and deleted.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::error::Result;
use crate::process::run_captured;

/// A generated script written to disk.
///
/// Dropping it without calling [`ScriptFile::keep`] removes the file.
#[derive(Debug)]
pub struct ScriptFile {
    file: NamedTempFile,
}

impl ScriptFile {
    /// Write `contents` to a new `__distra-XXXXXX.sh` file in `dir`.
    pub fn create(dir: &Path, contents: &str) -> Result<Self> {
        let mut file = Builder::new()
            .prefix("__distra-")
            .suffix(".sh")
            .tempfile_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        log::debug!("wrote script {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Persist the script and return its path.
    pub fn keep(self) -> Result<PathBuf> {
        let (_, path) = self.file.keep().map_err(|e| e.error)?;
        Ok(path)
    }

    /// Run the script with `shell`, then delete it. Returns the script's
    /// standard output.
    pub fn execute(self, shell: &str) -> Result<String> {
        let path = self.path().to_string_lossy().into_owned();
        log::info!("running {path}");
        let output = run_captured(shell, &[path.as_str()])?;
        self.file.close()?;
        log::info!("deleted {path}");
        Ok(output)
    }
}
