//! @ai:module:intent Function-call completion benchmark: corpus construction and evaluation
//! @ai:module:layer application
//! @ai:module:public_api config, corpus, error, evaluator, metrics, report, runner

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod report;
pub mod runner;

pub use config::BenchConfig;
pub use corpus::{AnalysisLoader, BuildStats, CorpusBuilder, TestRecord};
pub use error::{Error, Result};
pub use evaluator::{Evaluator, FileComparison};
pub use metrics::{PairedComparison, PairedSignificanceTester};
pub use report::{ComparisonResults, ReportGenerator};
pub use runner::{GeneratorTrait, HttpGenerator, MockGenerator, PredictionExecutor};
