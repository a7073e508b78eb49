//! Validation and wildcard expansion of requested build targets.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, ALL};
use crate::error::{DistraError, Result};

/// Architectures requested per operating system, before validation.
///
/// Entries are literal architecture names or the [`ALL`] sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    requested: BTreeMap<String, Vec<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `archs` for `os`, replacing any earlier request for it.
    pub fn insert(&mut self, os: impl Into<String>, archs: Vec<String>) {
        self.requested.insert(os.into(), archs);
    }

    /// Overlay `other` on top of this selection; its operating systems win.
    pub fn merge(&mut self, other: Selection) {
        self.requested.extend(other.requested);
    }

    /// Architectures requested for `os`.
    pub fn get(&self, os: &str) -> Option<&[String]> {
        self.requested.get(os).map(Vec::as_slice)
    }

    /// True when no operating system has a non-empty request.
    pub fn is_empty(&self) -> bool {
        self.requested.values().all(Vec::is_empty)
    }

    /// Every requested (os, arch) pair, sentinels included.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.requested
            .iter()
            .flat_map(|(os, archs)| archs.iter().map(move |arch| (os.as_str(), arch.as_str())))
    }
}

impl From<Catalog> for Selection {
    /// A parsed `Distrafile` is read as a request for exactly its pairs.
    fn from(catalog: Catalog) -> Self {
        Self {
            requested: catalog.into_inner(),
        }
    }
}

/// Validated, wildcard-expanded targets ready for script generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSelection {
    targets: BTreeMap<String, Vec<String>>,
}

impl ResolvedSelection {
    /// Architectures to build for `os`.
    pub fn architectures(&self, os: &str) -> Option<&[String]> {
        self.targets.get(os).map(Vec::as_slice)
    }

    /// Operating systems with at least one target.
    pub fn operating_systems(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Every (os, arch) pair, operating systems in sorted order and
    /// architectures in request order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.targets
            .iter()
            .flat_map(|(os, archs)| archs.iter().map(move |arch| (os.as_str(), arch.as_str())))
    }

    /// Total number of (os, arch) targets.
    pub fn target_count(&self) -> usize {
        self.targets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Every target the catalog lists.
pub fn resolve_all(catalog: &Catalog) -> ResolvedSelection {
    ResolvedSelection {
        targets: catalog
            .operating_systems()
            .filter_map(|os| {
                let archs = catalog.architectures(os)?;
                (!archs.is_empty()).then(|| (os.to_string(), archs.to_vec()))
            })
            .collect(),
    }
}

/// Validate `selection` against `catalog`, expanding `all` wildcards.
///
/// Operating systems with an empty request are dropped. A list containing
/// `all` becomes the catalog's full list for that OS; any other entries in
/// it are ignored. An empty result is not an error.
pub fn resolve(selection: &Selection, catalog: &Catalog) -> Result<ResolvedSelection> {
    let mut targets = BTreeMap::new();

    for (os, archs) in &selection.requested {
        if archs.is_empty() {
            continue;
        }

        let Some(known) = catalog.architectures(os) else {
            return Err(DistraError::UnknownOperatingSystem { os: os.clone() });
        };

        if archs.iter().any(|arch| arch == ALL) {
            log::debug!("expanding '{ALL}' for {os} to {} architectures", known.len());
            targets.insert(os.clone(), known.to_vec());
            continue;
        }

        if let Some(bad) = archs.iter().find(|arch| !known.contains(*arch)) {
            return Err(DistraError::InvalidArchitecture {
                os: os.clone(),
                arch: bad.clone(),
            });
        }
        targets.insert(os.clone(), archs.clone());
    }

    Ok(ResolvedSelection { targets })
}
