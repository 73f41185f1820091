//! @ai:module:intent Corpus construction pipeline: locate, sample, budget-filter, write
//! @ai:module:layer application
//! @ai:module:public_api CorpusBuilder, BuildStats
//! @ai:module:stateless false

use crate::corpus::analysis::ExportedFunction;
use crate::corpus::budget::BudgetFilter;
use crate::corpus::loader::{AnalysisLoaderTrait, ProjectAnalysis};
use crate::corpus::locator::{CallOccurrence, CallSpanLocator};
use crate::corpus::record::TestRecord;
use crate::corpus::sampler::CorpusSampler;
use crate::corpus::writer::{check_output, prepare_output, CorpusWriter};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// @ai:intent Counters reported after a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub analysis_files: usize,
    pub skipped_documents: usize,
    pub projects: usize,
    pub functions: usize,
    pub occurrences: usize,
    pub sampled: usize,
    pub rejected_by_budget: usize,
    pub records_written: usize,
}

/// @ai:intent A function with at least one located call
struct Candidate<'a> {
    function: &'a ExportedFunction,
    source_file_path: &'a str,
    occurrences: Vec<CallOccurrence>,
}

/// @ai:intent Builds the benchmark corpus from analyzer output
pub struct CorpusBuilder {
    locator: CallSpanLocator,
    sampler: CorpusSampler,
    budgets: BudgetFilter,
}

impl CorpusBuilder {
    /// @ai:intent Create a builder from caller-owned sampler and budgets
    /// @ai:effects pure
    pub fn new(sampler: CorpusSampler, budgets: BudgetFilter) -> Self {
        Self {
            locator: CallSpanLocator::new(),
            sampler,
            budgets,
        }
    }

    /// @ai:intent Load analyses and write the corpus file
    /// @ai:post configuration failures leave no output file behind
    /// @ai:effects fs:read, fs:write
    pub fn build<L: AnalysisLoaderTrait>(
        &mut self,
        loader: &L,
        analysis_dir: &Path,
        output: &Path,
        force: bool,
    ) -> Result<BuildStats> {
        check_output(output, force)?;

        let loaded = loader.load_all(analysis_dir)?;
        prepare_output(output, force)?;

        let mut writer = CorpusWriter::create(output)?;
        let mut stats = self.build_records(&loaded.projects, |record| writer.write(&record))?;
        stats.analysis_files = loaded.found;
        stats.skipped_documents = loaded.skipped.len();
        writer.finish()?;

        tracing::info!(
            "Wrote {} records from {} projects to {}",
            stats.records_written,
            stats.projects,
            output.display()
        );
        Ok(stats)
    }

    /// @ai:intent Emit accepted records in project, file, function order
    /// @ai:pre projects are sorted by name
    /// @ai:effects state:write
    pub fn build_records<F>(&mut self, projects: &[ProjectAnalysis], mut emit: F) -> Result<BuildStats>
    where
        F: FnMut(TestRecord) -> Result<()>,
    {
        let mut stats = BuildStats::default();

        for project in projects {
            let candidates = self.collect_candidates(project);

            if candidates.is_empty() {
                continue;
            }

            stats.projects += 1;
            let signatures = project.signatures.to_vec();

            for candidate in candidates {
                stats.functions += 1;
                stats.occurrences += candidate.occurrences.len();

                let selected = self.sampler.sample(&candidate.occurrences);
                stats.sampled += selected.len();

                for occurrence in &selected {
                    let model_input = BudgetFilter::model_input(
                        &signatures,
                        &candidate.function.text,
                        occurrence.end,
                    );

                    if !self.budgets.admits(&model_input)? {
                        stats.rejected_by_budget += 1;
                        continue;
                    }

                    emit(TestRecord::from_occurrence(
                        signatures.clone(),
                        &candidate.function.text,
                        occurrence,
                        candidate.source_file_path,
                    ))?;
                    stats.records_written += 1;
                }
            }
        }

        tracing::info!("Found {} valid projects", stats.projects);
        Ok(stats)
    }

    /// @ai:intent Functions of a project that call at least one of its exported functions
    /// @ai:effects pure
    fn collect_candidates<'a>(&self, project: &'a ProjectAnalysis) -> Vec<Candidate<'a>> {
        let mut candidates = Vec::new();

        for file in &project.document {
            for function in &file.exported_functions {
                let occurrences = self.locator.locate(function, &project.signatures);

                if occurrences.is_empty() {
                    continue;
                }

                candidates.push(Candidate {
                    function,
                    source_file_path: &file.file_path,
                    occurrences,
                });
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::analysis::{FileDetail, ProjectSignatures};
    use crate::corpus::budget::tests::{CharCounter, WordCounter};
    use crate::corpus::budget::TokenBudget;
    use crate::corpus::loader::AnalysisLoader;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const ANALYSIS: &str = r#"[
      {
        "filePath": "src/f.ts",
        "exportedFunctions": [
          {
            "signature": "f()",
            "text": "function f(){ g(1); g(1); h(2); }",
            "functionCalls": [
              {"text": "g(1)", "functionName": "g", "functionSource": "src/g.ts"},
              {"text": "g(1)", "functionName": "g", "functionSource": "src/g.ts"},
              {"text": "h(2)", "functionName": "h", "functionSource": "src/h.ts"},
              {"text": "console.log(1)", "functionName": "log", "functionSource": ""}
            ]
          },
          {"signature": "g(x)", "text": "function g(x){ return x; }", "functionCalls": []},
          {"signature": "h(y)", "text": "function h(y){ return y; }", "functionCalls": []}
        ]
      }
    ]"#;

    fn generous_budgets() -> BudgetFilter {
        BudgetFilter::new(vec![
            TokenBudget::new("words", 1000, Box::new(WordCounter)),
            TokenBudget::new("chars", 1000, Box::new(CharCounter)),
            TokenBudget::new("words-2", 1000, Box::new(WordCounter)),
        ])
        .unwrap()
    }

    fn project() -> ProjectAnalysis {
        let document: Vec<FileDetail> = serde_json::from_str(ANALYSIS).unwrap();
        let signatures = ProjectSignatures::from_document(&document);
        ProjectAnalysis {
            name: "project.json".to_string(),
            document,
            signatures,
        }
    }

    fn collect(builder: &mut CorpusBuilder, projects: &[ProjectAnalysis]) -> (Vec<TestRecord>, BuildStats) {
        let mut records = Vec::new();
        let stats = builder
            .build_records(projects, |record| {
                records.push(record);
                Ok(())
            })
            .unwrap();
        (records, stats)
    }

    #[test]
    fn test_end_to_end_selects_all_three_occurrences() {
        let mut builder = CorpusBuilder::new(CorpusSampler::new(42, 1.0, 3), generous_budgets());
        let (records, stats) = collect(&mut builder, &[project()]);

        assert_eq!(stats.functions, 1);
        assert_eq!(stats.occurrences, 3);
        assert_eq!(records.len(), 3);

        let mut truths: Vec<_> = records.iter().map(|r| r.ground_truth.as_str()).collect();
        truths.sort();
        assert_eq!(truths, vec!["g(1)", "g(1)", "h(2)"]);

        let text = "function f(){ g(1); g(1); h(2); }";
        for record in &records {
            let joined = format!("{}{}", record.input, record.ground_truth);
            assert!(text.starts_with(&joined));
            assert_eq!(record.source_file_path, "src/f.ts");
            assert_eq!(record.signatures, vec!["f()", "g(x)", "h(y)"]);
        }
    }

    #[test]
    fn test_budget_rejection_is_silent() {
        let tight = BudgetFilter::new(vec![
            TokenBudget::new("words", 1000, Box::new(WordCounter)),
            TokenBudget::new("chars", 10, Box::new(CharCounter)),
            TokenBudget::new("words-2", 1000, Box::new(WordCounter)),
        ])
        .unwrap();

        let mut builder = CorpusBuilder::new(CorpusSampler::new(42, 1.0, 3), tight);
        let (records, stats) = collect(&mut builder, &[project()]);

        assert!(records.is_empty());
        assert_eq!(stats.sampled, 3);
        assert_eq!(stats.rejected_by_budget, 3);
    }

    #[test]
    fn test_sampling_cap_applies_per_function() {
        let mut builder = CorpusBuilder::new(CorpusSampler::new(42, 1.0, 2), generous_budgets());
        let (records, _) = collect(&mut builder, &[project()]);
        assert_eq!(records.len(), 2);
    }

    fn write_analysis(dir: &Path) {
        std::fs::write(dir.join("b_project.json"), ANALYSIS).unwrap();
        std::fs::write(dir.join("a_project.json"), ANALYSIS.replace("src/f.ts", "src/other.ts")).unwrap();
        std::fs::write(dir.join("broken.json"), "[{").unwrap();
    }

    #[test]
    fn test_same_seed_produces_identical_bytes() {
        let temp = TempDir::new().unwrap();
        let analysis_dir = temp.path().join("analysis");
        std::fs::create_dir_all(&analysis_dir).unwrap();
        write_analysis(&analysis_dir);

        let run = |name: &str| {
            let output = temp.path().join(name);
            let mut builder =
                CorpusBuilder::new(CorpusSampler::new(1234, 0.7, 3), generous_budgets());
            let stats = builder
                .build(&AnalysisLoader::new(), &analysis_dir, &output, false)
                .unwrap();
            (std::fs::read(&output).unwrap(), stats)
        };

        let (first, stats) = run("first.jsonl");
        let (second, _) = run("second.jsonl");

        assert_eq!(first, second);
        assert_eq!(stats.analysis_files, 3);
        assert_eq!(stats.skipped_documents, 1);
        assert_eq!(stats.projects, 2);

        let content = String::from_utf8(first).unwrap();
        let first_line: TestRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first_line.source_file_path, "src/other.ts");
    }

    #[test]
    fn test_existing_output_fails_before_loading() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("test.jsonl");
        std::fs::write(&output, "keep").unwrap();

        let mut builder = CorpusBuilder::new(CorpusSampler::new(1, 1.0, 3), generous_budgets());
        let result = builder.build(&AnalysisLoader::new(), &temp.path().join("missing"), &output, false);

        assert!(matches!(result, Err(Error::Configuration(_))));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep");
    }

    #[test]
    fn test_missing_analysis_dir_creates_no_output() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("test.jsonl");

        let mut builder = CorpusBuilder::new(CorpusSampler::new(1, 1.0, 3), generous_budgets());
        let result = builder.build(&AnalysisLoader::new(), &temp.path().join("missing"), &output, true);

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
