//! @ai:module:intent Run a generation service over every record of a corpus
//! @ai:module:layer application
//! @ai:module:public_api PredictionExecutor, PredictionSummary, render_input
//! @ai:module:stateless false

use crate::corpus::{prepare_output, CorpusWriter, PredictionRecord, TestRecord};
use crate::error::{Error, Result};
use crate::runner::client::GeneratorTrait;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// @ai:intent Outcome of one prediction run
#[derive(Debug, Clone)]
pub struct PredictionSummary {
    pub model: String,
    pub output: PathBuf,
    pub records: usize,
    pub execution_time_ms: u64,
}

/// @ai:intent Model input for a record, optionally preceded by the project's signatures
/// @ai:effects pure
pub fn render_input(record: &TestRecord, with_signatures: bool) -> String {
    if !with_signatures {
        return record.input.clone();
    }

    format!(
        "/* available functions:\n{}\n*/\n{}",
        record.signatures.join("\n"),
        record.input
    )
}

/// @ai:intent Feeds corpus records to a generator and stores its continuations
pub struct PredictionExecutor<G: GeneratorTrait> {
    generator: Arc<G>,
    with_signatures: bool,
}

impl<G: GeneratorTrait> PredictionExecutor<G> {
    /// @ai:intent Create a new prediction executor
    /// @ai:effects pure
    pub fn new(generator: Arc<G>, with_signatures: bool) -> Self {
        Self {
            generator,
            with_signatures,
        }
    }

    /// @ai:intent Prediction file for this generator inside an output directory
    /// @ai:effects pure
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.jsonl", self.generator.name()))
    }

    /// @ai:intent Generate a prediction for every corpus line, in order
    /// @ai:pre corpus is a JSON-lines file of test records
    /// @ai:effects fs:read, fs:write, network
    pub async fn run(&self, corpus: &Path, output_dir: &Path, force: bool) -> Result<PredictionSummary> {
        if !corpus.is_file() {
            return Err(Error::config(format!("Test file {} does not exist", corpus.display())));
        }

        let output = self.output_path(output_dir);
        prepare_output(&output, force)?;

        tracing::info!(
            "Running {} on {} (signatures={})",
            self.generator.name(),
            corpus.display(),
            self.with_signatures
        );

        let start = std::time::Instant::now();
        let file = std::fs::File::open(corpus).map_err(|source| Error::FileRead {
            path: corpus.to_path_buf(),
            source,
        })?;
        let mut writer = CorpusWriter::create(&output)?;

        for line in BufReader::new(file).lines() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let record: TestRecord = serde_json::from_str(&line)?;
            let input = render_input(&record, self.with_signatures);
            let prediction = self.generator.generate(&input).await?;

            writer.write(&PredictionRecord { record, prediction })?;

            if writer.written() % 100 == 0 {
                tracing::debug!("{}: {} predictions", self.generator.name(), writer.written());
            }
        }

        let records = writer.finish()?;

        Ok(PredictionSummary {
            model: self.generator.name().to_string(),
            output,
            records,
            execution_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::client::MockGenerator;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn record() -> TestRecord {
        TestRecord {
            signatures: vec!["g(x)".to_string(), "h(y)".to_string()],
            input: "function f(){ ".to_string(),
            ground_truth: "g(1)".to_string(),
            source_file_path: "src/f.ts".to_string(),
        }
    }

    fn write_corpus(dir: &Path, count: usize) -> PathBuf {
        let path = dir.join("corpus.jsonl");
        let lines: Vec<String> = (0..count)
            .map(|_| serde_json::to_string(&record()).unwrap())
            .collect();
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    }

    /// Records every input it receives
    struct RecordingGenerator {
        inputs: Mutex<Vec<String>>,
    }

    impl GeneratorTrait for RecordingGenerator {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(&self, input: &str) -> Result<String> {
            self.inputs.lock().unwrap().push(input.to_string());
            Ok("g(1);".to_string())
        }
    }

    /// Fails on the second record
    struct FlakyGenerator {
        calls: Mutex<usize>,
    }

    impl GeneratorTrait for FlakyGenerator {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn generate(&self, _input: &str) -> Result<String> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == 2 {
                return Err(Error::Generation("flaky returned 500".to_string()));
            }
            Ok("g(1);".to_string())
        }
    }

    #[test]
    fn test_render_without_signatures() {
        assert_eq!(render_input(&record(), false), "function f(){ ");
    }

    #[test]
    fn test_render_with_signatures() {
        assert_eq!(
            render_input(&record(), true),
            "/* available functions:\ng(x)\nh(y)\n*/\nfunction f(){ "
        );
    }

    #[tokio::test]
    async fn test_run_writes_predictions() {
        let temp = TempDir::new().unwrap();
        let corpus = write_corpus(temp.path(), 3);
        let out_dir = temp.path().join("predictions");

        let generator = Arc::new(RecordingGenerator {
            inputs: Mutex::new(Vec::new()),
        });
        let executor = PredictionExecutor::new(generator.clone(), true);
        let summary = executor.run(&corpus, &out_dir, false).await.unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.output, out_dir.join("recording.jsonl"));
        assert_eq!(generator.inputs.lock().unwrap().len(), 3);
        assert!(generator.inputs.lock().unwrap()[0].starts_with("/* available functions:"));

        let content = std::fs::read_to_string(&summary.output).unwrap();
        let first: PredictionRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first.record, record());
        assert_eq!(first.prediction, "g(1);");
    }

    #[tokio::test]
    async fn test_existing_output_requires_force() {
        let temp = TempDir::new().unwrap();
        let corpus = write_corpus(temp.path(), 1);
        let out_dir = temp.path().join("predictions");

        let executor = PredictionExecutor::new(Arc::new(MockGenerator::new("mock", "")), false);
        executor.run(&corpus, &out_dir, false).await.unwrap();

        let again = executor.run(&corpus, &out_dir, false).await;
        assert!(matches!(again, Err(Error::Configuration(_))));

        let forced = executor.run(&corpus, &out_dir, true).await.unwrap();
        assert_eq!(forced.records, 1);
    }

    #[tokio::test]
    async fn test_generation_failure_aborts_run() {
        let temp = TempDir::new().unwrap();
        let corpus = write_corpus(temp.path(), 3);
        let out_dir = temp.path().join("predictions");

        let generator = Arc::new(FlakyGenerator {
            calls: Mutex::new(0),
        });
        let executor = PredictionExecutor::new(generator.clone(), false);
        let result = executor.run(&corpus, &out_dir, false).await;

        assert!(matches!(result, Err(Error::Generation(_))));
        assert_eq!(*generator.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_corpus() {
        let temp = TempDir::new().unwrap();
        let executor = PredictionExecutor::new(Arc::new(MockGenerator::new("mock", "")), false);
        let result = executor
            .run(&temp.path().join("missing.jsonl"), temp.path(), false)
            .await;
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
