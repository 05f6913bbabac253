//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The two headed recommendation lists
//! - A trailing summary with the skip count
//! - Skipped declarations with reasons in verbose mode

use crate::domain::{ScanReport, UpdateRecommendation};
use crate::output::{OutputFormatter, Verbosity};
use crate::registry::PackageIndex;
use colored::Colorize;
use std::io::Write;

/// Heading above the lower-bound-raisable list
pub const RAISABLE_HEADING: &str =
    "The following dependencies can get their lower bounds updated:";

/// Heading above the needs-full-review list
pub const REVIEW_HEADING: &str =
    "The following dependencies should get looked at for a full update:";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn write_heading(&self, heading: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", heading.bold())
        } else {
            writeln!(writer, "{}", heading)
        }
    }

    fn write_recommendation(
        &self,
        recommendation: &UpdateRecommendation,
        index: &dyn PackageIndex,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let latest = recommendation
            .latest_stable
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let link = index.project_url(&recommendation.name);

        if self.color {
            writeln!(
                writer,
                "  {}: latest {}, {}: {}",
                recommendation.constraint_text,
                latest.green(),
                index.registry_name(),
                link.dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {}: latest {}, {}: {}",
                recommendation.constraint_text,
                latest,
                index.registry_name(),
                link
            )
        }
    }

    fn write_list(
        &self,
        heading: &str,
        recommendations: &[UpdateRecommendation],
        index: &dyn PackageIndex,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_heading(heading, writer)?;
        for recommendation in recommendations {
            self.write_recommendation(recommendation, index, writer)?;
        }
        writeln!(writer)
    }

    fn write_summary(&self, report: &ScanReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let line = format!(
            "Audited {} dependencies: {} raisable, {} need review, {} up to date, {} without stable releases",
            report.total_audited(),
            report.lower_bound_raisable.len(),
            report.needs_full_review.len(),
            report.up_to_date,
            report.no_data,
        );
        if self.color {
            writeln!(writer, "{}", line.dimmed())?;
        } else {
            writeln!(writer, "{}", line)?;
        }

        let skipped = report.skipped_count();
        if skipped > 0 {
            let line = format!("{} skipped due to errors", skipped);
            if self.color {
                writeln!(writer, "{}", line.yellow())?;
            } else {
                writeln!(writer, "{}", line)?;
            }
        }

        if self.verbosity == Verbosity::Verbose {
            for entry in &report.skipped {
                writeln!(writer, "  - {}", entry)?;
            }
        }

        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(
        &self,
        report: &ScanReport,
        index: &dyn PackageIndex,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_list(
            RAISABLE_HEADING,
            &report.lower_bound_raisable,
            index,
            writer,
        )?;
        self.write_list(REVIEW_HEADING, &report.needs_full_review, index, writer)?;

        if self.verbosity != Verbosity::Quiet {
            self.write_summary(report, writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{sample_report, LinkOnlyIndex};

    fn render(verbosity: Verbosity, report: &ScanReport) -> String {
        let formatter = TextFormatter::with_color(verbosity, false);
        let mut out = Vec::new();
        formatter.format(report, &LinkOnlyIndex, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_lists_under_headings() {
        let output = render(Verbosity::Normal, &sample_report());

        let raisable = output.find(RAISABLE_HEADING).unwrap();
        let review = output.find(REVIEW_HEADING).unwrap();
        let httpx = output
            .find("  httpx>=0.27.0,<0.29: latest 0.28.1, PyPI: https://pypi.org/project/httpx/")
            .unwrap();
        let pydantic = output
            .find("  pydantic>=1.10,<2: latest 2.9.2, PyPI: https://pypi.org/project/pydantic/")
            .unwrap();

        assert!(raisable < httpx);
        assert!(httpx < review);
        assert!(review < pydantic);
        assert!(!output.contains("jinja2"));
    }

    #[test]
    fn test_summary_reports_skips() {
        let output = render(Verbosity::Normal, &sample_report());
        assert!(output.contains(
            "Audited 3 dependencies: 1 raisable, 1 need review, 1 up to date, 0 without stable releases"
        ));
        assert!(output.contains("1 skipped due to errors"));
        assert!(!output.contains("ghost>=1"));
    }

    #[test]
    fn test_verbose_lists_skipped_entries() {
        let output = render(Verbosity::Verbose, &sample_report());
        assert!(output.contains("  - ghost>=1: fetch failed: package 'ghost' not found in PyPI"));
    }

    #[test]
    fn test_quiet_omits_summary() {
        let output = render(Verbosity::Quiet, &sample_report());
        assert!(output.contains(RAISABLE_HEADING));
        assert!(!output.contains("Audited"));
        assert!(!output.contains("skipped"));
    }

    #[test]
    fn test_empty_report_prints_headings() {
        let output = render(Verbosity::Normal, &ScanReport::new());
        assert!(output.contains(RAISABLE_HEADING));
        assert!(output.contains(REVIEW_HEADING));
        assert!(!output.contains("skipped due to errors"));
    }
}
