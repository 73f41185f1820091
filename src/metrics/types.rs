//! @ai:module:intent Metric types for call-completion evaluation
//! @ai:module:layer domain
//! @ai:module:public_api Granularity, MetricKind, MetricBundle, CallMetrics, EvaluationResult
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent What is compared: the whole call or only the callee name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    FunctionCall,
    FunctionName,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::FunctionCall, Granularity::FunctionName];

    /// @ai:intent Human-readable label
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::FunctionCall => "Function Call",
            Granularity::FunctionName => "Function Name",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Scoring function applied at each granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ExactMatch,
    EditSimilarity,
}

impl MetricKind {
    pub const ALL: [MetricKind; 2] = [MetricKind::ExactMatch, MetricKind::EditSimilarity];

    /// @ai:intent Human-readable label
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::ExactMatch => "Exact Match",
            MetricKind::EditSimilarity => "Edit Similarity",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Scores for one ground truth / prediction pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    /// 1 when identical after trimming, else 0
    pub exact_match: u8,
    /// In [0, 1]
    pub edit_similarity: f64,
}

impl MetricBundle {
    /// @ai:intent Value of one metric as a float
    /// @ai:effects pure
    pub fn value(&self, metric: MetricKind) -> f64 {
        match metric {
            MetricKind::ExactMatch => f64::from(self.exact_match),
            MetricKind::EditSimilarity => self.edit_similarity,
        }
    }
}

/// @ai:intent Both granularities for one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallMetrics {
    pub function_call: MetricBundle,
    pub function_name: MetricBundle,
}

impl CallMetrics {
    /// @ai:intent Bundle for a granularity
    /// @ai:effects pure
    pub fn bundle(&self, granularity: Granularity) -> &MetricBundle {
        match granularity {
            Granularity::FunctionCall => &self.function_call,
            Granularity::FunctionName => &self.function_name,
        }
    }

    /// @ai:intent Value of one metric at one granularity
    /// @ai:effects pure
    pub fn value(&self, granularity: Granularity, metric: MetricKind) -> f64 {
        self.bundle(granularity).value(metric)
    }
}

/// @ai:intent Per-record outcome; None when no call or identifier could be extracted
pub type EvaluationResult = Option<CallMetrics>;
