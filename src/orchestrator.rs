//! Scan orchestrator for coordinating the audit workflow
//!
//! This module provides:
//! - Workflow coordination: parse → fetch → filter → classify
//! - Sequential index queries, one awaited request per project; a project
//!   declared under several spellings or groups is fetched once per run
//! - Per-entry error recovery: a failing declaration is recorded and skipped

use crate::audit::classify;
use crate::domain::{
    DependencySpec, PublishedVersionSet, ScanReport, SkipReason, SkippedEntry,
    UpdateRecommendation,
};
use crate::manifest::DeclarationStore;
use crate::progress::Progress;
use crate::registry::PackageIndex;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Published version strings keyed by normalized project name
type VersionCache = HashMap<String, Vec<String>>;

/// Orchestrator for the scan workflow
pub struct Orchestrator {
    /// Index adapter for version queries
    index: Box<dyn PackageIndex>,
    /// Whether to draw a progress bar
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator querying `index`
    pub fn new(index: Box<dyn PackageIndex>) -> Self {
        Self {
            index,
            show_progress: false,
        }
    }

    /// Enable or disable the progress bar (builder pattern)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The index adapter in use
    pub fn index(&self) -> &dyn PackageIndex {
        self.index.as_ref()
    }

    /// Audit every declared dependency, core group first
    pub async fn run(&self, store: &DeclarationStore) -> ScanReport {
        let mut progress = Progress::new(self.show_progress);
        let mut report = ScanReport::new();
        let mut fetched = VersionCache::new();

        progress.start(store.len() as u64, "Querying index");

        for requirement in store.requirements() {
            progress.set_message(requirement);

            match self.audit(requirement, &mut fetched).await {
                Ok(recommendation) => {
                    debug!(
                        requirement,
                        category = %recommendation.category,
                        "classified"
                    );
                    report.add(recommendation);
                }
                Err(reason) => {
                    warn!(requirement, %reason, "skipping dependency");
                    report.add_skipped(SkippedEntry::new(requirement, reason));
                }
            }

            progress.inc();
        }

        progress.finish_and_clear();
        report
    }

    /// Audit a single declaration
    async fn audit(
        &self,
        requirement: &str,
        fetched: &mut VersionCache,
    ) -> Result<UpdateRecommendation, SkipReason> {
        let dependency = DependencySpec::parse(requirement)
            .map_err(|e| SkipReason::ParseError(e.to_string()))?;

        let key = dependency.normalized_name();
        let raw_versions = match fetched.get(&key) {
            Some(versions) => versions.clone(),
            None => {
                let versions = self
                    .index
                    .fetch_versions(&dependency.name)
                    .await
                    .map_err(|e| SkipReason::FetchFailed(e.to_string()))?;
                fetched.insert(key, versions.clone());
                versions
            }
        };

        let published = PublishedVersionSet::from_strings(&raw_versions);
        debug!(
            package = %dependency.name,
            fetched = raw_versions.len(),
            valid = published.len(),
            "fetched versions"
        );

        Ok(classify(&dependency, &published))
    }
}
