//! Classification of declared dependencies against published versions
//!
//! Decides, per dependency, whether the declared lower bound can be raised
//! or whether the whole constraint needs a review. Pre-release and
//! development versions never count as the latest release.

use crate::domain::{Category, DependencySpec, PublishedVersionSet, UpdateRecommendation};

/// Classify one dependency.
///
/// Rules, in order:
/// 1. no stable release published: `NoData`
/// 2. latest stable release outside the constraint: `NeedsFullReview`
/// 3. `>=` bound present and below the latest stable release: `LowerBoundRaisable`
/// 4. otherwise: `UpToDate`
pub fn classify(
    dependency: &DependencySpec,
    published: &PublishedVersionSet,
) -> UpdateRecommendation {
    let lower_bound = dependency.lower_bound().cloned();

    let Some(latest) = published.latest_stable().cloned() else {
        return UpdateRecommendation::new(
            &dependency.name,
            &dependency.raw,
            lower_bound,
            None,
            Category::NoData,
        );
    };

    let category = if !dependency.constraint.contains(&latest) {
        Category::NeedsFullReview
    } else if lower_bound.as_ref().is_some_and(|bound| *bound < latest) {
        Category::LowerBoundRaisable
    } else {
        Category::UpToDate
    };

    UpdateRecommendation::new(
        &dependency.name,
        &dependency.raw,
        lower_bound,
        Some(latest),
        category,
    )
}
