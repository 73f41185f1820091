//! @ai:module:intent Persist comparison results as JSON and read them back
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, JsonReporterTrait
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::metrics::{Granularity, MetricKind};
use crate::report::ComparisonResults;
use std::path::Path;

/// @ai:intent Trait for the machine-readable results file
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write results as pretty JSON
    fn generate(&self, results: &ComparisonResults, output_path: &Path) -> Result<()>;

    /// @ai:intent Read results written by `generate`
    fn load(&self, input_path: &Path) -> Result<ComparisonResults>;
}

/// @ai:intent Reads and writes results.json
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Every file must carry one comparison per granularity and metric
    /// @ai:effects pure
    fn check_complete(results: &ComparisonResults, path: &Path) -> Result<()> {
        for file in &results.files {
            for granularity in Granularity::ALL {
                for metric in MetricKind::ALL {
                    if file.comparison.get(granularity, metric).is_none() {
                        return Err(Error::config(format!(
                            "{}: {} has no {} / {} comparison",
                            path.display(),
                            file.file,
                            granularity,
                            metric
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects fs:write
    fn generate(&self, results: &ComparisonResults, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }

    /// @ai:effects fs:read
    fn load(&self, input_path: &Path) -> Result<ComparisonResults> {
        let content = std::fs::read_to_string(input_path).map_err(|source| Error::FileRead {
            path: input_path.to_path_buf(),
            source,
        })?;
        let results: ComparisonResults = serde_json::from_str(&content)?;
        Self::check_complete(&results, input_path)?;
        Ok(results)
    }
}
