//! @ai:module:intent Benchmark record definitions persisted as JSON lines
//! @ai:module:layer domain
//! @ai:module:public_api TestRecord, PredictionRecord
//! @ai:module:stateless true

use crate::corpus::locator::CallOccurrence;
use serde::{Deserialize, Serialize};

/// @ai:intent One "complete this call" sample
/// @ai:invariant input + gt == function text truncated at the occurrence end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub signatures: Vec<String>,
    pub input: String,
    #[serde(rename = "gt")]
    pub ground_truth: String,
    pub source_file_path: String,
}

impl TestRecord {
    /// @ai:intent Split a function at a located call
    /// @ai:pre occurrence was located in function_text
    /// @ai:effects pure
    pub fn from_occurrence(
        signatures: Vec<String>,
        function_text: &str,
        occurrence: &CallOccurrence,
        source_file_path: &str,
    ) -> Self {
        Self {
            signatures,
            input: function_text[..occurrence.begin].to_string(),
            ground_truth: function_text[occurrence.begin..occurrence.end].to_string(),
            source_file_path: source_file_path.to_string(),
        }
    }
}

/// @ai:intent A test record with a model's raw continuation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(flatten)]
    pub record: TestRecord,
    pub prediction: String,
}
