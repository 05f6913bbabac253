//! Audit decision types

use super::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of one declared dependency against the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Latest stable release falls outside the declared constraint
    NeedsFullReview,
    /// Latest stable release is allowed and newer than the declared `>=` bound
    LowerBoundRaisable,
    /// Nothing to do
    UpToDate,
    /// The index has no stable release for this package
    NoData,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::NeedsFullReview => write!(f, "needs-full-review"),
            Category::LowerBoundRaisable => write!(f, "lower-bound-raisable"),
            Category::UpToDate => write!(f, "up-to-date"),
            Category::NoData => write!(f, "no-data"),
        }
    }
}

/// Result of comparing a declared dependency with its published versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecommendation {
    /// Project name as declared
    pub name: String,
    /// The declaration as written
    pub constraint_text: String,
    /// Operand of the first `>=` clause
    pub declared_lower_bound: Option<Version>,
    /// Highest stable published version (absent for `NoData`)
    pub latest_stable: Option<Version>,
    /// The classification
    pub category: Category,
}

impl UpdateRecommendation {
    /// Creates a recommendation
    pub fn new(
        name: impl Into<String>,
        constraint_text: impl Into<String>,
        declared_lower_bound: Option<Version>,
        latest_stable: Option<Version>,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            constraint_text: constraint_text.into(),
            declared_lower_bound,
            latest_stable,
            category,
        }
    }
}

impl fmt::Display for UpdateRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.latest_stable {
            Some(latest) => write!(
                f,
                "{}: latest {} ({})",
                self.constraint_text, latest, self.category
            ),
            None => write!(f, "{}: {}", self.constraint_text, self.category),
        }
    }
}
