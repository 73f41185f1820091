//! @ai:module:intent Paired comparison of two evaluation runs over the same samples
//! @ai:module:layer application
//! @ai:module:public_api PairedSignificanceTester, PairedComparison, MetricComparison, aligned_indices
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::metrics::significance::{cliffs_delta, wilcoxon_signed_rank, SignedRankTest};
use crate::metrics::types::{CallMetrics, EvaluationResult, Granularity, MetricKind};
use serde::{Deserialize, Serialize};

/// p-values at or below this report an effect size
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// @ai:intent Comparison of one metric at one granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricComparison {
    pub granularity: Granularity,
    pub metric: MetricKind,
    /// Mean scaled by 100
    pub with_signatures_mean: f64,
    /// Mean scaled by 100
    pub without_signatures_mean: f64,
    pub test: SignedRankTest,
    pub significant: bool,
    /// Cliff's delta, present only when significant
    pub effect_size: Option<f64>,
}

/// @ai:intent Full paired comparison of two runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairedComparison {
    pub with_signatures_valid: usize,
    pub without_signatures_valid: usize,
    pub paired: usize,
    pub metrics: Vec<MetricComparison>,
}

impl PairedComparison {
    /// @ai:intent Look up one metric's comparison
    /// @ai:effects pure
    pub fn get(&self, granularity: Granularity, metric: MetricKind) -> Option<&MetricComparison> {
        self.metrics
            .iter()
            .find(|m| m.granularity == granularity && m.metric == metric)
    }
}

/// @ai:intent Indices where both runs produced a result
/// @ai:pre a.len() == b.len()
/// @ai:effects pure
pub fn aligned_indices<T>(a: &[Option<T>], b: &[Option<T>]) -> Vec<usize> {
    a.iter()
        .zip(b)
        .enumerate()
        .filter(|(_, (x, y))| x.is_some() && y.is_some())
        .map(|(i, _)| i)
        .collect()
}

/// @ai:intent Runs signed-rank tests and effect sizes over aligned results
pub struct PairedSignificanceTester {
    alpha: f64,
}

impl PairedSignificanceTester {
    /// @ai:intent Create a tester at the conventional 0.05 level
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            alpha: SIGNIFICANCE_LEVEL,
        }
    }

    /// @ai:intent Compare two runs; a failed extraction on either side drops the pair
    /// @ai:pre both runs score the same samples in the same order
    /// @ai:effects pure
    pub fn compare(
        &self,
        with_signatures: &[EvaluationResult],
        without_signatures: &[EvaluationResult],
    ) -> Result<PairedComparison> {
        if with_signatures.len() != without_signatures.len() {
            return Err(Error::config(format!(
                "Results must be of equal size: {} with signatures, {} without",
                with_signatures.len(),
                without_signatures.len()
            )));
        }

        let indices = aligned_indices(with_signatures, without_signatures);
        let pairs: Vec<(&CallMetrics, &CallMetrics)> = indices
            .iter()
            .filter_map(|&i| Some((with_signatures[i].as_ref()?, without_signatures[i].as_ref()?)))
            .collect();

        let mut metrics = Vec::with_capacity(4);

        for granularity in Granularity::ALL {
            for metric in MetricKind::ALL {
                let with_values: Vec<f64> = pairs
                    .iter()
                    .map(|(w, _)| w.value(granularity, metric))
                    .collect();
                let without_values: Vec<f64> = pairs
                    .iter()
                    .map(|(_, wo)| wo.value(granularity, metric))
                    .collect();

                metrics.push(self.compare_metric(granularity, metric, &with_values, &without_values));
            }
        }

        Ok(PairedComparison {
            with_signatures_valid: count_valid(with_signatures),
            without_signatures_valid: count_valid(without_signatures),
            paired: pairs.len(),
            metrics,
        })
    }

    /// @ai:intent Test one metric's aligned value sequences
    /// @ai:effects pure
    fn compare_metric(
        &self,
        granularity: Granularity,
        metric: MetricKind,
        with_values: &[f64],
        without_values: &[f64],
    ) -> MetricComparison {
        let test = wilcoxon_signed_rank(with_values, without_values);
        let significant = test.p_value <= self.alpha;
        let effect_size = significant.then(|| cliffs_delta(with_values, without_values));

        MetricComparison {
            granularity,
            metric,
            with_signatures_mean: scaled_mean(with_values),
            without_signatures_mean: scaled_mean(without_values),
            test,
            significant,
            effect_size,
        }
    }
}

impl Default for PairedSignificanceTester {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Number of non-null results
/// @ai:effects pure
fn count_valid(results: &[EvaluationResult]) -> usize {
    results.iter().filter(|r| r.is_some()).count()
}

/// @ai:intent Mean ×100, zero for an empty slice
/// @ai:effects pure
fn scaled_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64 * 100.0
}
