//! Versions published on the package index
//!
//! Index metadata may carry legacy version strings that are not valid
//! PEP 440; those are dropped when the set is built.

use super::Version;
use std::collections::BTreeSet;

/// The parsed versions available for one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedVersionSet {
    versions: BTreeSet<Version>,
}

impl PublishedVersionSet {
    /// Build a set from raw index strings, silently skipping invalid ones
    pub fn from_strings<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let versions = raw
            .into_iter()
            .filter_map(|s| Version::parse(s.as_ref()))
            .collect();
        Self { versions }
    }

    /// Number of valid versions
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns true when no valid version was published
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// All versions in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    /// Versions without pre-release or development markers, ascending
    pub fn stable_versions(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter().filter(|v| v.is_stable())
    }

    /// Highest stable version
    pub fn latest_stable(&self) -> Option<&Version> {
        self.versions.iter().rev().find(|v| v.is_stable())
    }
}

impl FromIterator<Version> for PublishedVersionSet {
    fn from_iter<T: IntoIterator<Item = Version>>(iter: T) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}
