//! Core domain models for depscan
//!
//! This module contains the fundamental types used throughout the application:
//! - PEP 440 versions and specifier sets
//! - Declared dependency structures
//! - Published version sets from the index
//! - Audit recommendations and the scan summary

mod dependency;
mod published;
mod recommendation;
mod specifier;
mod summary;
mod version;

pub use dependency::{normalize_name, DependencySpec};
pub use published::PublishedVersionSet;
pub use recommendation::{Category, UpdateRecommendation};
pub use specifier::{Clause, Constraint, Operator};
pub use summary::{ScanReport, SkipReason, SkippedEntry};
pub use version::{PreRelease, PreReleaseKind, Version};
