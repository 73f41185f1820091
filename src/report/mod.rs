//! @ai:module:intent Report generation for signature-ablation comparisons
//! @ai:module:layer infrastructure
//! @ai:module:public_api ComparisonResults, ReportGenerator, JsonReporter, MarkdownReporter

pub mod json_report;
pub mod markdown_report;

pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::error::Result;
use crate::evaluator::FileComparison;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Everything one `evaluate` run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResults {
    pub timestamp: String,
    pub with_signatures_dir: PathBuf,
    pub without_signatures_dir: PathBuf,
    pub files: Vec<FileComparison>,
}

impl ComparisonResults {
    /// @ai:intent Stamp comparisons with the current time
    /// @ai:effects time
    pub fn new(with_signatures_dir: &Path, without_signatures_dir: &Path, files: Vec<FileComparison>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            with_signatures_dir: with_signatures_dir.to_path_buf(),
            without_signatures_dir: without_signatures_dir.to_path_buf(),
            files,
        }
    }
}

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
        }
    }

    /// @ai:intent Write results.json and results.md
    /// @ai:effects fs:write
    pub fn generate_all(&self, results: &ComparisonResults, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(results, &output_dir.join("results.json"))?;
        self.markdown
            .generate(results, &output_dir.join("results.md"))?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }

    /// @ai:intent Render results.md from a saved results.json
    /// @ai:effects fs:read, fs:write
    pub fn render_markdown(&self, results_path: &Path, output_path: &Path) -> Result<ComparisonResults> {
        let results = self.json.load(results_path)?;
        self.markdown.generate(&results, output_path)?;
        Ok(results)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
