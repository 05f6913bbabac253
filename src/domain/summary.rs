//! Scan result summary types
//!
//! Collects the per-dependency recommendations of one scan run together
//! with the entries that could not be audited.

use super::{Category, UpdateRecommendation};
use std::fmt;

/// Reason why a declared dependency could not be audited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The declaration does not match the requirement grammar
    ParseError(String),
    /// The index query failed
    FetchFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ParseError(msg) => write!(f, "parse error: {}", msg),
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
        }
    }
}

/// A declaration that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// The declaration as written
    pub requirement: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

impl SkippedEntry {
    /// Creates a new skipped entry
    pub fn new(requirement: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            requirement: requirement.into(),
            reason,
        }
    }
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.requirement, self.reason)
    }
}

/// Overall result of one scan run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Dependencies whose `>=` bound can be raised, in declaration order
    pub lower_bound_raisable: Vec<UpdateRecommendation>,
    /// Dependencies whose constraint excludes the latest stable release
    pub needs_full_review: Vec<UpdateRecommendation>,
    /// Number of dependencies needing no action
    pub up_to_date: usize,
    /// Number of dependencies without stable releases on the index
    pub no_data: usize,
    /// Declarations that could not be audited
    pub skipped: Vec<SkippedEntry>,
}

impl ScanReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a recommendation under its category
    pub fn add(&mut self, recommendation: UpdateRecommendation) {
        match recommendation.category {
            Category::LowerBoundRaisable => self.lower_bound_raisable.push(recommendation),
            Category::NeedsFullReview => self.needs_full_review.push(recommendation),
            Category::UpToDate => self.up_to_date += 1,
            Category::NoData => self.no_data += 1,
        }
    }

    /// Records a declaration that could not be audited
    pub fn add_skipped(&mut self, entry: SkippedEntry) {
        self.skipped.push(entry);
    }

    /// Number of declarations that were classified
    pub fn total_audited(&self) -> usize {
        self.lower_bound_raisable.len()
            + self.needs_full_review.len()
            + self.up_to_date
            + self.no_data
    }

    /// Number of declarations that could not be audited
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
