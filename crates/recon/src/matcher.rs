//! Fuzzy title comparison.
//!
//! Scores are the classic edit-distance ratio on a 0..=100 scale: insertions
//! and deletions cost 1, a substitution costs 2 (one of each), and the score
//! is `100 * (len(a) + len(b) - distance) / (len(a) + len(b))`, rounded.
//! Inputs are expected to be already normalized.

/// Minimum score for two normalized titles to denote the same work.
pub const TITLE_MATCH_THRESHOLD: u8 = 98;

/// Similarity ratio of two normalized titles on a 0..=100 scale.
///
/// Two empty strings score 100.
pub fn similarity_score(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    let distance = total - 2 * lcs_len(&a, &b);
    let ratio = 100.0 * (total - distance) as f64 / total as f64;
    ratio.round() as u8
}

/// True when two normalized titles score at or above [`TITLE_MATCH_THRESHOLD`].
pub fn titles_match(a: &str, b: &str) -> bool {
    similarity_score(a, b) >= TITLE_MATCH_THRESHOLD
}

/// Longest common subsequence length, two-row DP over the shorter side.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
