//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of scan reports
//! - Per-recommendation constraint, bound, latest version and link

use crate::domain::{Category, ScanReport, UpdateRecommendation};
use crate::output::{OutputFormatter, Verbosity};
use crate::registry::PackageIndex;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput {
    /// Index the versions came from
    index: String,
    /// Summary statistics
    summary: JsonSummary,
    /// Dependencies whose lower bound can be raised
    lower_bound_raisable: Vec<JsonRecommendation>,
    /// Dependencies needing a full review
    needs_full_review: Vec<JsonRecommendation>,
    /// Skipped declarations (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<JsonSkip>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    audited: usize,
    up_to_date: usize,
    no_data: usize,
    skipped: usize,
}

/// JSON representation of a recommendation
#[derive(Serialize)]
struct JsonRecommendation {
    name: String,
    constraint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower_bound: Option<String>,
    latest: Option<String>,
    category: Category,
    url: String,
}

/// JSON representation of a skipped declaration
#[derive(Serialize)]
struct JsonSkip {
    requirement: String,
    reason: String,
}

fn to_json(recommendation: &UpdateRecommendation, index: &dyn PackageIndex) -> JsonRecommendation {
    JsonRecommendation {
        name: recommendation.name.clone(),
        constraint: recommendation.constraint_text.clone(),
        lower_bound: recommendation
            .declared_lower_bound
            .as_ref()
            .map(|v| v.to_string()),
        latest: recommendation.latest_stable.as_ref().map(|v| v.to_string()),
        category: recommendation.category,
        url: index.project_url(&recommendation.name),
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(
        &self,
        report: &ScanReport,
        index: &dyn PackageIndex,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let skipped = if self.verbosity == Verbosity::Verbose {
            report
                .skipped
                .iter()
                .map(|entry| JsonSkip {
                    requirement: entry.requirement.clone(),
                    reason: entry.reason.to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let output = JsonOutput {
            index: index.registry_name().to_string(),
            summary: JsonSummary {
                audited: report.total_audited(),
                up_to_date: report.up_to_date,
                no_data: report.no_data,
                skipped: report.skipped_count(),
            },
            lower_bound_raisable: report
                .lower_bound_raisable
                .iter()
                .map(|r| to_json(r, index))
                .collect(),
            needs_full_review: report
                .needs_full_review
                .iter()
                .map(|r| to_json(r, index))
                .collect(),
            skipped,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
