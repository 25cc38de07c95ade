use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Dotted engine version as reported by the `version` handshake.
///
/// Comparison uses place-value weighting so that a whole version compares
/// as a single signed number: `major * 10000 + minor * 100 + patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
}

impl Version {
    pub fn new(major: i32, minor: i32, patch: i32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Signed distance from `min`. Negative means this version is older.
    pub fn delta(&self, min: &Version) -> i32 {
        (self.major - min.major) * 10000 + (self.minor - min.minor) * 100 + (self.patch - min.patch)
    }

    pub fn satisfies(&self, min: &Version) -> bool {
        self.delta(min) >= 0
    }
}

impl FromStr for Version {
    type Err = CoreError;

    /// Parses `major.minor[.patch]`; a missing patch component is padded
    /// with zero. Fewer than two components is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() < 2 {
            return Err(CoreError::UnparseableVersion(s.to_string()));
        }
        let component = |idx: usize| -> Result<i32, CoreError> {
            match parts.get(idx) {
                Some(p) => p
                    .parse()
                    .map_err(|_| CoreError::UnparseableVersion(s.to_string())),
                None => Ok(0),
            }
        };
        Ok(Self {
            major: component(0)?,
            minor: component(1)?,
            patch: component(2)?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
