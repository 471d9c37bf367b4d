//! Edit distance and normalized string similarity.
//!
//! Both functions operate on Unicode scalar values (`char`s), not bytes, so
//! a multi-byte character counts as a single edit.

/// Compute the Levenshtein distance between `a` and `b`.
///
/// Returns the minimum number of single-character insertions, deletions,
/// and substitutions needed to turn `a` into `b`. Uses the classic dynamic
/// programming matrix of `(|b| + 1) x (|a| + 1)` cells, allocated and
/// initialized in full before the fill.
///
/// # Examples
///
/// ```
/// use fieldsearch::distance::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
/// assert_eq!(levenshtein_distance("", "abc"), 3);
/// assert_eq!(levenshtein_distance("same", "same"), 0);
/// ```
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // matrix[i][j] = distance between the first `j` chars of `a` and the
    // first `i` chars of `b`.
    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            let substitution = if b[i - 1] == a[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j - 1] + substitution)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j] + 1);
        }
    }

    matrix[b.len()][a.len()]
}

/// Normalized similarity between two strings in `[0.0, 1.0]`.
///
/// Computed as `(longer_len - distance) / longer_len`, where lengths are
/// measured in characters. Two empty strings are identical and score `1.0`.
/// The result does not depend on argument order.
///
/// # Examples
///
/// ```
/// use fieldsearch::distance::similarity;
///
/// assert_eq!(similarity("", ""), 1.0);
/// assert_eq!(similarity("john", "jon"), 0.75);
/// assert_eq!(similarity("abc", "xyz"), 0.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (longer, shorter, longer_len) = if a_len >= b_len {
        (a, b, a_len)
    } else {
        (b, a, b_len)
    };

    if longer_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(longer, shorter);
    (longer_len - distance) as f64 / longer_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("lead", "lead"), 0);
    }

    #[test]
    fn distance_against_empty_is_length() {
        assert_eq!(levenshtein_distance("abcd", ""), 4);
        assert_eq!(levenshtein_distance("", "abcd"), 4);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(
            levenshtein_distance("saturday", "sunday"),
            levenshtein_distance("sunday", "saturday"),
        );
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
    }

    #[test]
    fn distance_counts_chars_not_bytes() {
        // 'e' -> 'é' is one substitution even though 'é' is two bytes.
        assert_eq!(levenshtein_distance("cafe", "caf\u{00e9}"), 1);
    }

    #[test]
    fn similarity_single_edit() {
        assert!((similarity("john", "jon") - 0.75).abs() < f64::EPSILON);
        assert!((similarity("jon", "john") - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_one_empty() {
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
    }

    #[test]
    fn similarity_identical() {
        assert_eq!(similarity("smith", "smith"), 1.0);
    }
}
