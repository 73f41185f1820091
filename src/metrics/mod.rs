//! @ai:module:intent Scoring and paired statistical comparison of evaluation runs
//! @ai:module:layer application
//! @ai:module:public_api CallMetrics, MetricBundle, Granularity, MetricKind, PairedSignificanceTester, PairedComparison

pub mod comparison;
pub mod significance;
pub mod similarity;
pub mod types;

pub use comparison::{
    aligned_indices, MetricComparison, PairedComparison, PairedSignificanceTester,
    SIGNIFICANCE_LEVEL,
};
pub use significance::{cliffs_delta, wilcoxon_signed_rank, SignedRankTest, TestMethod};
pub use similarity::{edit_similarity, exact_match};
pub use types::{CallMetrics, EvaluationResult, Granularity, MetricBundle, MetricKind};
