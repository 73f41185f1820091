//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::error::Result;
use crate::evaluator::FileComparison;
use crate::metrics::MetricComparison;
use crate::report::ComparisonResults;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from results
    fn generate(&self, results: &ComparisonResults, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from comparison results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format a delta value with sign
    /// @ai:effects pure
    fn format_delta(value: f64) -> String {
        if value >= 0.0 {
            format!("+{:.2}", value)
        } else {
            format!("{:.2}", value)
        }
    }

    /// @ai:intent Effect size cell, blank unless significant
    /// @ai:effects pure
    fn format_effect(metric: &MetricComparison) -> String {
        metric
            .effect_size
            .map(|d| format!("{:.3}", d))
            .unwrap_or_else(|| "-".to_string())
    }

    /// @ai:intent Generate overall summary section
    /// @ai:effects pure
    fn generate_summary(results: &ComparisonResults) -> String {
        let mut output = String::new();

        writeln!(output, "# Signature Ablation Results").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", results.timestamp).unwrap();
        writeln!(
            output,
            "**With signatures:** `{}`",
            results.with_signatures_dir.display()
        )
        .unwrap();
        writeln!(
            output,
            "**Without signatures:** `{}`",
            results.without_signatures_dir.display()
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate the table for one prediction file
    /// @ai:effects pure
    fn generate_file_section(file: &FileComparison) -> String {
        let mut output = String::new();
        let comparison = &file.comparison;

        writeln!(output, "## {}", file.file).unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Valid results: {} with signatures, {} without, {} paired.",
            comparison.with_signatures_valid, comparison.without_signatures_valid, comparison.paired
        )
        .unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Granularity | Metric | With | Without | Delta | p | Cliff's d |"
        )
        .unwrap();
        writeln!(output, "|-------------|--------|------|---------|-------|---|-----------|").unwrap();

        for metric in &comparison.metrics {
            writeln!(
                output,
                "| {} | {} | {:.2} | {:.2} | {} | {:.3}{} | {} |",
                metric.granularity,
                metric.metric,
                metric.with_signatures_mean,
                metric.without_signatures_mean,
                Self::format_delta(metric.with_signatures_mean - metric.without_signatures_mean),
                metric.test.p_value,
                if metric.significant { "*" } else { "" },
                Self::format_effect(metric)
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &ComparisonResults, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_summary(results));
        for file in &results.files {
            content.push_str(&Self::generate_file_section(file));
        }

        std::fs::write(output_path, content)?;
        Ok(())
    }
}
