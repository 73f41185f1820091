//! @ai:module:intent String similarity scores for predicted calls
//! @ai:module:layer domain
//! @ai:module:public_api exact_match, edit_similarity, score
//! @ai:module:stateless true

use crate::metrics::types::MetricBundle;

/// @ai:intent Exact match after trimming surrounding whitespace
/// @ai:effects pure
pub fn exact_match(ground_truth: &str, prediction: &str) -> u8 {
    u8::from(ground_truth.trim() == prediction.trim())
}

/// @ai:intent Normalized InDel similarity over chars
/// @ai:post result in [0, 1]; two empty strings score 1
/// @ai:effects pure
///
/// `(|a| + |b| - indel(a, b)) / (|a| + |b|)`, which equals `2 * lcs / (|a| + |b|)`.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();

    if total == 0 {
        return 1.0;
    }

    let distance = indel_distance(&a, &b);
    (total - distance) as f64 / total as f64
}

/// @ai:intent Insert/delete edit distance via longest common subsequence
/// @ai:effects pure
fn indel_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row LCS table
    let mut prev_row = vec![0usize; b.len() + 1];
    let mut curr_row = vec![0usize; b.len() + 1];

    for a_char in a {
        for (j, b_char) in b.iter().enumerate() {
            curr_row[j + 1] = if a_char == b_char {
                prev_row[j] + 1
            } else {
                curr_row[j].max(prev_row[j + 1])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    let lcs = prev_row[b.len()];
    a.len() + b.len() - 2 * lcs
}

/// @ai:intent Score a prediction against its ground truth
/// @ai:effects pure
pub fn score(ground_truth: &str, prediction: &str) -> MetricBundle {
    MetricBundle {
        exact_match: exact_match(ground_truth, prediction),
        edit_similarity: edit_similarity(ground_truth, prediction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_trims() {
        assert_eq!(exact_match("g(1)", "  g(1)\n"), 1);
        assert_eq!(exact_match("g(1)", "g(2)"), 0);
    }

    #[test]
    fn test_identical_strings() {
        assert!((edit_similarity("compute(a, b)", "compute(a, b)") - 1.0).abs() < 1e-12);
        assert!((edit_similarity("", "") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_strings_score_near_zero() {
        assert!(edit_similarity("abcd", "wxyz") < 1e-12);
        assert!(edit_similarity("abc", "").abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap() {
        // lcs("kitten", "sitting") = 4 ("ittn"), total 13
        let expected = 8.0 / 13.0;
        assert!((edit_similarity("kitten", "sitting") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric() {
        let forward = edit_similarity("getUser(id)", "getUsers()");
        let backward = edit_similarity("getUsers()", "getUser(id)");
        assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn test_indel_distance() {
        let a: Vec<char> = "abc".chars().collect();
        let b: Vec<char> = "abd".chars().collect();
        assert_eq!(indel_distance(&a, &b), 2);
    }
}
