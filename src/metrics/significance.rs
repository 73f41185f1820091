//! @ai:module:intent Paired non-parametric testing: Wilcoxon signed-rank and Cliff's delta
//! @ai:module:layer domain
//! @ai:module:public_api wilcoxon_signed_rank, cliffs_delta, SignedRankTest, TestMethod
//! @ai:module:stateless true
//!
//! Zero differences are discarded before ranking and tied absolute differences share
//! their average rank. The exact null distribution applies only to small samples with
//! no ties and no discarded zeros; anything else uses the normal approximation with
//! tie correction and no continuity correction.

use serde::{Deserialize, Serialize};

/// Largest sample for which the exact null distribution is enumerated
const EXACT_MAX_N: usize = 50;

/// @ai:intent How the p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    Exact,
    Normal,
    /// Every difference was zero
    NoDifferences,
}

/// @ai:intent Outcome of a two-sided Wilcoxon signed-rank test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignedRankTest {
    /// min(W+, W-)
    pub statistic: f64,
    pub p_value: f64,
    /// Non-zero differences that entered the test
    pub n: usize,
    pub method: TestMethod,
}

/// @ai:intent Two-sided Wilcoxon signed-rank test on paired samples `x[i]`, `y[i]`
/// @ai:pre x.len() == y.len()
/// @ai:effects pure
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> SignedRankTest {
    debug_assert_eq!(x.len(), y.len());

    let differences: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();
    let n = differences.len();
    let has_zeros = n < x.len();

    if n == 0 {
        return SignedRankTest {
            statistic: 0.0,
            p_value: 1.0,
            n,
            method: TestMethod::NoDifferences,
        };
    }

    let (ranks, tie_sizes) = average_ranks(&differences);

    let r_plus: f64 = differences
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let statistic = r_plus.min(total - r_plus);

    let has_ties = tie_sizes.iter().any(|&t| t > 1);

    if n <= EXACT_MAX_N && !has_ties && !has_zeros {
        let p_value = (2.0 * exact_lower_tail(n, statistic.round() as usize)).min(1.0);
        return SignedRankTest {
            statistic,
            p_value,
            n,
            method: TestMethod::Exact,
        };
    }

    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;
    let tie_correction: f64 = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum::<f64>()
        / 48.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_correction;

    let p_value = if variance > 0.0 {
        let z = (statistic - mean) / variance.sqrt();
        erfc(z.abs() / std::f64::consts::SQRT_2).min(1.0)
    } else {
        1.0
    };

    SignedRankTest {
        statistic,
        p_value,
        n,
        method: TestMethod::Normal,
    }
}

/// @ai:intent Ranks of |d| (1-based, ties averaged) and the size of each tie group
/// @ai:effects pure
fn average_ranks(differences: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..differences.len()).collect();
    order.sort_by(|&a, &b| differences[a].abs().total_cmp(&differences[b].abs()));

    let mut ranks = vec![0.0; differences.len()];
    let mut tie_sizes = Vec::new();
    let mut start = 0;

    while start < order.len() {
        let value = differences[order[start]].abs();
        let mut end = start + 1;
        while end < order.len() && differences[order[end]].abs() == value {
            end += 1;
        }

        // positions start..end hold ranks start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        tie_sizes.push(end - start);
        start = end;
    }

    (ranks, tie_sizes)
}

/// @ai:intent P(W <= t) under the null for untied ranks 1..=n
/// @ai:effects pure
fn exact_lower_tail(n: usize, t: usize) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0f64; max_sum + 1];
    counts[0] = 1.0;

    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            counts[sum] += counts[sum - rank];
        }
    }

    let favourable: f64 = counts[..=t.min(max_sum)].iter().sum();
    favourable / 2f64.powi(n as i32)
}

/// Complementary error function, fractional error below 1.2e-7
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();

    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// @ai:intent Cliff's delta: P(x > y) - P(x < y) over all cross pairs
/// @ai:post result in [-1, 1]
/// @ai:effects pure
pub fn cliffs_delta(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }

    let mut sorted = y.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let dominance: i64 = x
        .iter()
        .map(|value| {
            let below = sorted.partition_point(|v| v < value) as i64;
            let above = (sorted.len() - sorted.partition_point(|v| v <= value)) as i64;
            below - above
        })
        .sum();

    dominance as f64 / (x.len() * y.len()) as f64
}
