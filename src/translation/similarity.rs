/*!
 * Edit-distance similarity between text fragments.
 *
 * Scores are normalized Levenshtein similarities in `[0, 1]`, computed on
 * characters rather than bytes so that multi-byte text compares correctly.
 */

/// Similarity matcher used to retrieve prior translations as examples
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityMatcher;

impl SimilarityMatcher {
    /// Calculate similarity between two strings (0.0-1.0)
    ///
    /// `1 - distance / max(len(a), len(b))`; two empty strings are identical.
    pub fn similarity(a: &str, b: &str) -> f64 {
        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();

        let max_len = a_chars.len().max(b_chars.len());
        if max_len == 0 {
            return 1.0;
        }

        let distance = levenshtein_distance(&a_chars, &b_chars);
        1.0 - (distance as f64 / max_len as f64)
    }

    /// Check if two strings are at least `threshold` similar
    pub fn matches(a: &str, b: &str, threshold: f64) -> bool {
        Self::similarity(a, b) >= threshold
    }
}

/// Shorthand for [`SimilarityMatcher::similarity`]
pub fn similarity(a: &str, b: &str) -> f64 {
    SimilarityMatcher::similarity(a, b)
}

/// Calculate Levenshtein distance between two character sequences
fn levenshtein_distance(a: &[char], b: &[char]) -> usize {
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use two-row optimization for space efficiency
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr_row[0] = i;

        for j in 1..=b_len {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1)                  // deletion
                .min(curr_row[j - 1] + 1)                    // insertion
                .min(prev_row[j - 1] + cost);                // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
