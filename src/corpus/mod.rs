//! @ai:module:intent Benchmark corpus construction from static-analysis output
//! @ai:module:layer domain
//! @ai:module:public_api AnalysisLoader, CallSpanLocator, CorpusSampler, BudgetFilter, CorpusWriter, CorpusBuilder, TestRecord

pub mod analysis;
pub mod budget;
pub mod builder;
pub mod loader;
pub mod locator;
pub mod record;
pub mod sampler;
pub mod writer;

pub use analysis::{AnalysisDocument, ExportedFunction, FileDetail, FunctionCall, ProjectSignatures};
pub use budget::{BudgetFilter, HfTokenCounter, TokenBudget, TokenCounter};
pub use builder::{BuildStats, CorpusBuilder};
pub use loader::{AnalysisLoader, AnalysisLoaderTrait, LoadedAnalyses, ProjectAnalysis};
pub use locator::{CallOccurrence, CallSpanLocator};
pub use record::{PredictionRecord, TestRecord};
pub use sampler::CorpusSampler;
pub use writer::{check_output, prepare_output, CorpusWriter};
