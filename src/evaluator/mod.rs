//! @ai:module:intent Evaluation of generated predictions against corpus ground truth
//! @ai:module:layer application
//! @ai:module:public_api Evaluator, FileComparison, CallExtractor, common_prediction_files

pub mod call_extractor;

pub use call_extractor::{first_balanced_call, CallExtractor, CallExtractorTrait};

use crate::corpus::PredictionRecord;
use crate::error::{Error, Result};
use crate::metrics::similarity::score;
use crate::metrics::{CallMetrics, EvaluationResult, PairedComparison, PairedSignificanceTester};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent Paired comparison for one prediction file name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileComparison {
    pub file: String,
    pub comparison: PairedComparison,
}

/// @ai:intent Scores predictions and compares runs with and without signatures
pub struct Evaluator {
    extractor: CallExtractor,
    tester: PairedSignificanceTester,
}

impl Evaluator {
    /// @ai:intent Create a new evaluator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            extractor: CallExtractor::new(),
            tester: PairedSignificanceTester::new(),
        }
    }

    /// @ai:intent Score one prediction; None when either side has no usable call
    /// @ai:effects pure
    pub fn evaluate_record(&self, ground_truth: &str, prediction: &str) -> EvaluationResult {
        let ground_truth = ground_truth.trim();
        let truth_name = self.extractor.identifier(ground_truth)?;

        let predicted_call = self.extractor.first_call(prediction.trim())?;
        let predicted_name = self.extractor.identifier(&predicted_call)?;

        Some(CallMetrics {
            function_call: score(ground_truth, &predicted_call),
            function_name: score(&truth_name, &predicted_name),
        })
    }

    /// @ai:intent Score every line of a prediction file, preserving order
    /// @ai:effects fs:read
    pub fn evaluate_file(&self, path: &Path) -> Result<Vec<EvaluationResult>> {
        let file = std::fs::File::open(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut results = Vec::new();

        for line in BufReader::new(file).lines() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let record: PredictionRecord = serde_json::from_str(&line)?;
            results.push(self.evaluate_record(&record.record.ground_truth, &record.prediction));
        }

        Ok(results)
    }

    /// @ai:intent Compare one pair of prediction files sharing a name
    /// @ai:effects fs:read
    pub fn compare_files(&self, name: &str, with_path: &Path, without_path: &Path) -> Result<FileComparison> {
        let with_results = self.evaluate_file(with_path)?;
        let without_results = self.evaluate_file(without_path)?;

        if with_results.len() != without_results.len() {
            return Err(Error::LineCountMismatch {
                file: name.to_string(),
                left: with_results.len(),
                right: without_results.len(),
            });
        }

        let comparison = self.tester.compare(&with_results, &without_results)?;
        Ok(FileComparison {
            file: name.to_string(),
            comparison,
        })
    }

    /// @ai:intent Compare every prediction file present in both directories
    /// @ai:effects fs:read
    pub fn compare_directories(&self, with_dir: &Path, without_dir: &Path) -> Result<Vec<FileComparison>> {
        let files = common_prediction_files(with_dir, without_dir)?;
        let mut comparisons = Vec::with_capacity(files.len());

        for name in files {
            tracing::info!("Evaluating {}", name);
            comparisons.push(self.compare_files(&name, &with_dir.join(&name), &without_dir.join(&name))?);
        }

        Ok(comparisons)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent `.jsonl` file names present in both directories, sorted
/// @ai:effects fs:read
pub fn common_prediction_files(with_dir: &Path, without_dir: &Path) -> Result<Vec<String>> {
    let with_files = prediction_files(with_dir)?;
    let without_files = prediction_files(without_dir)?;

    let common: Vec<String> = with_files.intersection(&without_files).cloned().collect();

    if common.is_empty() {
        return Err(Error::config(format!(
            "There are no common files in {} and {}",
            with_dir.display(),
            without_dir.display()
        )));
    }

    Ok(common)
}

/// @ai:intent Names of the `.jsonl` files directly inside a directory
/// @ai:effects fs:read
fn prediction_files(dir: &Path) -> Result<BTreeSet<String>> {
    if !dir.is_dir() {
        return Err(Error::config(format!("Directory {} does not exist", dir.display())));
    }

    Ok(WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|ext| ext == "jsonl").unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Granularity, MetricKind};
    use tempfile::TempDir;

    fn line(gt: &str, prediction: &str) -> String {
        serde_json::json!({
            "signatures": ["g(x)"],
            "input": "function f(){ ",
            "gt": gt,
            "source_file_path": "src/f.ts",
            "prediction": prediction,
        })
        .to_string()
    }

    fn write_lines(path: &Path, lines: &[String]) {
        std::fs::write(path, lines.join("\n") + "\n").unwrap();
    }

    #[test]
    fn test_exact_prediction() {
        let metrics = Evaluator::new().evaluate_record("g(1)", "g(1); h(2);").unwrap();
        assert_eq!(metrics.function_call.exact_match, 1);
        assert_eq!(metrics.function_name.exact_match, 1);
        assert!((metrics.function_call.edit_similarity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_right_name_wrong_arguments() {
        let metrics = Evaluator::new().evaluate_record("getUser(id)", "getUser(userId)\n}").unwrap();
        assert_eq!(metrics.function_call.exact_match, 0);
        assert_eq!(metrics.function_name.exact_match, 1);
        assert!(metrics.function_call.edit_similarity < 1.0);
    }

    #[test]
    fn test_negated_ground_truth() {
        let metrics = Evaluator::new().evaluate_record("!isReady()", "isReady()").unwrap();
        assert_eq!(metrics.function_call.exact_match, 0);
        assert_eq!(metrics.function_name.exact_match, 1);
    }

    #[test]
    fn test_extraction_failures_yield_none() {
        let evaluator = Evaluator::new();
        assert!(evaluator.evaluate_record("obj.run()", "obj.run()").is_none());
        assert!(evaluator.evaluate_record("g(1)", "return x;").is_none());
        assert!(evaluator.evaluate_record("g(1)", ") g(1)").is_none());
        assert!(evaluator.evaluate_record("g(1)", "this.g(1)").is_none());
    }

    #[test]
    fn test_compare_directories() {
        let temp = TempDir::new().unwrap();
        let with_dir = temp.path().join("with");
        let without_dir = temp.path().join("without");
        std::fs::create_dir_all(&with_dir).unwrap();
        std::fs::create_dir_all(&without_dir).unwrap();

        write_lines(
            &with_dir.join("model.jsonl"),
            &[line("g(1)", "g(1);"), line("h(2)", "h(2)"), line("g(3)", "")],
        );
        write_lines(
            &without_dir.join("model.jsonl"),
            &[line("g(1)", "f(1);"), line("h(2)", "x.h(2)"), line("g(3)", "g(4)")],
        );
        write_lines(&with_dir.join("only_here.jsonl"), &[line("g(1)", "g(1)")]);

        let comparisons = Evaluator::new().compare_directories(&with_dir, &without_dir).unwrap();
        assert_eq!(comparisons.len(), 1);

        let comparison = &comparisons[0].comparison;
        assert_eq!(comparisons[0].file, "model.jsonl");
        assert_eq!(comparison.with_signatures_valid, 2);
        assert_eq!(comparison.without_signatures_valid, 2);
        assert_eq!(comparison.paired, 1);

        let exact = comparison
            .get(Granularity::FunctionCall, MetricKind::ExactMatch)
            .unwrap();
        assert!((exact.with_signatures_mean - 100.0).abs() < 1e-9);
        assert!(exact.without_signatures_mean.abs() < 1e-9);
    }

    #[test]
    fn test_line_count_mismatch_is_fatal() {
        let temp = TempDir::new().unwrap();
        let with_dir = temp.path().join("with");
        let without_dir = temp.path().join("without");
        std::fs::create_dir_all(&with_dir).unwrap();
        std::fs::create_dir_all(&without_dir).unwrap();

        write_lines(&with_dir.join("m.jsonl"), &[line("g(1)", "g(1)"), line("g(1)", "g(1)")]);
        write_lines(&without_dir.join("m.jsonl"), &[line("g(1)", "g(1)")]);

        let result = Evaluator::new().compare_directories(&with_dir, &without_dir);
        assert!(matches!(result, Err(Error::LineCountMismatch { left: 2, right: 1, .. })));
    }

    #[test]
    fn test_no_common_files() {
        let temp = TempDir::new().unwrap();
        let with_dir = temp.path().join("with");
        let without_dir = temp.path().join("without");
        std::fs::create_dir_all(&with_dir).unwrap();
        std::fs::create_dir_all(&without_dir).unwrap();
        write_lines(&with_dir.join("a.jsonl"), &[line("g(1)", "g(1)")]);
        write_lines(&without_dir.join("b.jsonl"), &[line("g(1)", "g(1)")]);

        let result = common_prediction_files(&with_dir, &without_dir);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
