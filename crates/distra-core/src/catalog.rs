//! The toolchain's supported operating systems and architectures.
//!
//! A catalog is parsed from newline-delimited `os/arch` pairs, the format
//! printed by `go tool dist list` and stored in a `Distrafile`. Both sources
//! go through the same parser.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DistraError, Result};

/// Sentinel meaning "every architecture the catalog lists".
pub const ALL: &str = "all";

static PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+/[a-z0-9]+$").expect("pair pattern compiles"));

/// Mapping from operating system to its supported architectures.
///
/// Operating systems are kept sorted by name. Architectures keep the order
/// in which the listing introduced them, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    platforms: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Parse a raw `os/arch` listing.
    ///
    /// Blank lines are skipped. The first line that does not match
    /// `[a-z0-9]+/[a-z0-9]+` fails the whole parse.
    pub fn parse(listing: &str) -> Result<Self> {
        let mut platforms: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (index, line) in listing.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((os, arch)) = line.split_once('/').filter(|_| PAIR.is_match(line)) else {
                return Err(DistraError::MalformedPlatformLine {
                    line: index + 1,
                    text: line.to_string(),
                });
            };
            platforms
                .entry(os.to_string())
                .or_default()
                .push(arch.to_string());
        }

        log::debug!("parsed catalog with {} operating systems", platforms.len());
        Ok(Self { platforms })
    }

    /// Operating system names, in sorted order.
    pub fn operating_systems(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    /// Architectures listed for `os`, if the catalog knows it.
    pub fn architectures(&self, os: &str) -> Option<&[String]> {
        self.platforms.get(os).map(Vec::as_slice)
    }

    /// Whether `os` is a catalog key.
    pub fn contains_os(&self, os: &str) -> bool {
        self.platforms.contains_key(os)
    }

    /// Every (os, arch) pair.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.platforms
            .iter()
            .flat_map(|(os, archs)| archs.iter().map(move |arch| (os.as_str(), arch.as_str())))
    }

    /// Number of operating systems.
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Look up architectures for a list of operating systems.
    ///
    /// `all` anywhere in `oses` selects every operating system. Otherwise each
    /// name must be a catalog key.
    pub fn lookup<'a>(&'a self, oses: &[String]) -> Result<ArchitectureListing<'a>> {
        if oses.iter().any(|os| os == ALL) {
            return Ok(ArchitectureListing {
                all: true,
                entries: self
                    .platforms
                    .iter()
                    .map(|(os, archs)| (os.as_str(), archs.as_slice()))
                    .collect(),
            });
        }

        let entries = oses
            .iter()
            .map(|os| {
                self.platforms
                    .get_key_value(os.as_str())
                    .map(|(os, archs)| (os.as_str(), archs.as_slice()))
                    .ok_or_else(|| DistraError::UnknownOperatingSystem { os: os.clone() })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ArchitectureListing {
            all: false,
            entries,
        })
    }

    pub(crate) fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.platforms
    }
}

/// Result of [`Catalog::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureListing<'a> {
    /// True when the query asked for every operating system.
    pub all: bool,
    /// (os, architectures) in query order.
    pub entries: Vec<(&'a str, &'a [String])>,
}
