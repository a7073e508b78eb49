//! `Distrafile` manifests: flat `os/arch` lines, one per target.
//!
//! A manifest uses the same line format as the toolchain's platform listing,
//! so reading one goes through [`Catalog::parse`].

use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::{DistraError, Result};
use crate::selection::Selection;

/// File name of a manifest inside its directory.
pub const FILE_NAME: &str = "Distrafile";

/// Path of the manifest inside `dir`.
pub fn path_in(dir: &Path) -> PathBuf {
    dir.join(FILE_NAME)
}

/// Render `os/arch` lines without a trailing newline.
///
/// Pairs are written as given, so an unexpanded `all` is written literally.
pub fn render<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(os, arch)| format!("{os}/{arch}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load a manifest's raw text.
pub fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DistraError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and parse a manifest into a selection.
pub fn load(path: &Path) -> Result<Selection> {
    let selection = Selection::from(Catalog::parse(&read(path)?)?);
    log::debug!("loaded manifest {}", path.display());
    Ok(selection)
}

/// Write `pairs` to `<dir>/Distrafile`, replacing any existing file.
pub fn write<'a>(
    dir: &Path,
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<PathBuf> {
    let path = path_in(dir);
    std::fs::write(&path, render(pairs)).map_err(|source| DistraError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
