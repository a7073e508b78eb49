//! `--emit-distrafile` — persist the resolved selection.

use std::path::{Path, PathBuf};

use anyhow::Result;

use distra_core::{manifest, ResolvedSelection};

/// Write `selection` as `<dir>/Distrafile`.
pub fn emit(dir: &Path, selection: &ResolvedSelection) -> Result<PathBuf> {
    log::info!("generating Distrafile...");
    for os in selection.operating_systems() {
        let count = selection.architectures(os).map_or(0, <[String]>::len);
        log::debug!("formatted {count} architectures of {os}");
    }
    let path = manifest::write(dir, selection.pairs())?;
    log::info!("wrote {} targets to {}", selection.target_count(), path.display());
    Ok(path)
}
