//! The shared monorepo version

use crate::core::error::ManifestError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Version triple carried by the shared manifest
///
/// Unlike semver, pre-release and build suffixes are rejected: every
/// release branch name is derived from exactly these three numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
}

impl Version {
  pub fn new(major: u64, minor: u64, patch: u64) -> Self {
    Self { major, minor, patch }
  }

  /// Next minor release: major kept, minor + 1, patch reset
  pub fn bumped(&self) -> Result<Self, ManifestError> {
    let minor = self.minor.checked_add(1).ok_or_else(|| ManifestError::InvalidVersion {
      value: self.to_string(),
      reason: "minor component cannot be bumped any further".to_string(),
    })?;
    Ok(Self::new(self.major, minor, 0))
  }
}

impl FromStr for Version {
  type Err = ManifestError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = |reason: String| ManifestError::InvalidVersion {
      value: s.to_string(),
      reason,
    };

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 3 {
      return Err(invalid(format!("expected 3 components, found {}", parts.len())));
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
      // u64::from_str would accept a leading '+'
      if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("component '{}' is not a number", part)));
      }
      *slot = part
        .parse()
        .map_err(|_| invalid(format!("component '{}' is out of range", part)))?;
    }

    Ok(Self::new(numbers[0], numbers[1], numbers[2]))
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
  }
}

/// Serialized as the dotted string, as it appears in the manifest
impl Serialize for Version {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Version {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}
