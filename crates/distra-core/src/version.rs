//! Three-part release versions used by the update check.
//!
//! Unlike full semantic versions these carry no pre-release or build
//! metadata: a version is exactly `major.minor.subminor`, and a blank
//! string stands for "nothing installed" (`0.0.0`).

use std::fmt;
use std::str::FromStr;

use crate::error::{DistraError, Result};

const COMPONENTS: [&str; 3] = ["major", "minor", "subminor"];

/// A parsed `major.minor.subminor` version.
///
/// Ordering is lexicographic over (major, minor, subminor).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub subminor: u64,
}

impl Version {
    /// Construct a version from its components.
    pub const fn new(major: u64, minor: u64, subminor: u64) -> Self {
        Self {
            major,
            minor,
            subminor,
        }
    }

    /// Parse a version string like "1.2.3".
    ///
    /// Blank input yields `0.0.0`. Each component is trimmed before being
    /// checked, and errors name the first offending component.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let parts: Vec<&str> = text.split('.').map(str::trim).collect();
        if parts.len() != COMPONENTS.len() {
            return Err(DistraError::VersionShape);
        }

        if let Some(i) = parts.iter().position(|p| p.is_empty()) {
            return Err(DistraError::EmptyVersionComponent {
                component: COMPONENTS[i],
            });
        }

        let mut values = [0u64; 3];
        for (i, part) in parts.iter().enumerate() {
            values[i] = part
                .parse()
                .map_err(|_| DistraError::NonNumericVersionComponent {
                    component: COMPONENTS[i],
                    value: (*part).to_string(),
                })?;
        }

        Ok(Self::new(values[0], values[1], values[2]))
    }
}

impl FromStr for Version {
    type Err = DistraError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.subminor)
    }
}
