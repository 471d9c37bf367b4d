//! Per-field match scoring.
//!
//! A field's score is the sum of five independent bonuses, clamped to `1.0`:
//!
//! | Bonus    | Formula                                          | Max |
//! |----------|--------------------------------------------------|-----|
//! | Count    | `min(spans, 3) * 0.2`                            | 0.6 |
//! | Coverage | `matched_chars / value_chars * 0.4`              | 0.4 |
//! | Position | `(value_chars - first_start) / value_chars * 0.2` | 0.2 |
//! | Exact    | `0.3` if the whole query occurs in the value     | 0.3 |
//! | Type     | `0.2` for email / phone shaped queries           | 0.2 |

use crate::field::{FieldType, SearchField};
use crate::matching::{MatchSpan, char_count};

/// Span count above which additional matches add nothing.
pub const MAX_COUNTED_MATCHES: usize = 3;

const COUNT_WEIGHT: f64 = 0.2;
const COVERAGE_WEIGHT: f64 = 0.4;
const POSITION_WEIGHT: f64 = 0.2;
const EXACT_BONUS: f64 = 0.3;
const TYPE_BONUS: f64 = 0.2;

/// Score a field's merged match spans in `[0.0, 1.0]`.
///
/// `value` and `query` are the lower-cased field value and the trimmed,
/// lower-cased query. Returns `0.0` when `matches` is empty. The function is
/// pure: identical inputs always give the identical score.
///
/// # Examples
///
/// ```
/// use fieldsearch::{MatchSpan, SearchField, score_field};
///
/// let field = SearchField::new("name", "Name", 1.0);
/// let score = score_field(&[MatchSpan::new(0, 4)], &field, "john smith", "jon");
/// // count 0.2 + coverage 0.16 + position 0.2
/// assert!((score - 0.56).abs() < 1e-9);
/// ```
pub fn score_field(matches: &[MatchSpan], field: &SearchField, value: &str, query: &str) -> f64 {
    let value_len = char_count(value);
    if matches.is_empty() || value_len == 0 {
        return 0.0;
    }
    let value_len_f = value_len as f64;

    let count_bonus = matches.len().min(MAX_COUNTED_MATCHES) as f64 * COUNT_WEIGHT;

    let matched: usize = matches.iter().map(MatchSpan::len).sum();
    let coverage_bonus = (matched as f64 / value_len_f) * COVERAGE_WEIGHT;

    let first_start = matches.iter().map(|m| m.start).min().unwrap_or(0);
    let position_bonus =
        (value_len.saturating_sub(first_start) as f64 / value_len_f) * POSITION_WEIGHT;

    let contains_query = !query.is_empty() && value.contains(query);
    let exact_bonus = if contains_query { EXACT_BONUS } else { 0.0 };

    let type_bonus = if contains_query && type_bonus_applies(field.field_type, query) {
        TYPE_BONUS
    } else {
        0.0
    };

    (count_bonus + coverage_bonus + position_bonus + exact_bonus + type_bonus).min(1.0)
}

/// Whether `query` has the shape the field type rewards.
///
/// Email fields reward queries containing `@` or a domain dot; phone fields
/// reward all-digit queries. A phone query with punctuation such as
/// `"555-123"` gets no bonus.
///
/// The dot case lets a bare domain such as `"x.com"` rank an email field
/// above a text field holding the same value.
fn type_bonus_applies(field_type: FieldType, query: &str) -> bool {
    match field_type {
        FieldType::Email => query.contains('@') || query.contains('.'),
        FieldType::Phone => query.bytes().all(|b| b.is_ascii_digit()),
        FieldType::Text | FieldType::Number => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(field_type: FieldType) -> SearchField {
        SearchField::new("f", "F", 1.0).with_type(field_type)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn no_matches_scores_zero() {
        assert_eq!(score_field(&[], &field(FieldType::Text), "abc", "abc"), 0.0);
    }

    #[test]
    fn full_exact_match_is_clamped() {
        // count 0.2 + coverage 0.4 + position 0.2 + exact 0.3 = 1.1
        let score = score_field(
            &[MatchSpan::new(0, 4)],
            &field(FieldType::Text),
            "acme",
            "acme",
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn later_match_scores_lower_position() {
        let f = field(FieldType::Number);
        let early = score_field(&[MatchSpan::new(0, 2)], &f, "12345678", "12");
        let late = score_field(&[MatchSpan::new(6, 8)], &f, "12345678", "78");
        assert!(early > late);
        // count 0.2 + coverage 0.1 + position 0.2 + exact 0.3
        assert!(approx(early, 0.8));
        // count 0.2 + coverage 0.1 + position 0.05 + exact 0.3
        assert!(approx(late, 0.65));
    }

    #[test]
    fn count_bonus_is_capped() {
        let f = field(FieldType::Number);
        let value = "ab ab ab ab ab ab ab ab ab ab";
        let three: Vec<MatchSpan> = (0..3).map(|i| MatchSpan::new(i * 3, i * 3 + 2)).collect();
        let five: Vec<MatchSpan> = (0..5).map(|i| MatchSpan::new(i * 3, i * 3 + 2)).collect();
        let s3 = score_field(&three, &f, value, "zz");
        let s5 = score_field(&five, &f, value, "zz");
        // Only coverage grows beyond three spans.
        let expected_gain = (4.0 / 29.0) * 0.4;
        assert!(approx(s5 - s3, expected_gain));
    }

    #[test]
    fn email_bonus_with_at_sign() {
        let value = "jane.doe@example.com";
        let spans = [MatchSpan::new(8, 16)];
        let email = score_field(&spans, &field(FieldType::Email), value, "@example");
        let text = score_field(&spans, &field(FieldType::Text), value, "@example");
        assert!(approx(email - text, 0.2));
    }

    #[test]
    fn email_bonus_with_domain_fragment() {
        let spans = [MatchSpan::new(5, 10)];
        let email = score_field(&spans, &field(FieldType::Email), "jane@x.com", "x.com");
        let text = score_field(&spans, &field(FieldType::Text), "jane@x.com", "x.com");
        assert!(email > text);
    }

    #[test]
    fn email_bonus_requires_email_shape() {
        let spans = [MatchSpan::new(0, 4)];
        let email = score_field(&spans, &field(FieldType::Email), "jane@x.com", "jane");
        let text = score_field(&spans, &field(FieldType::Text), "jane@x.com", "jane");
        assert!(approx(email, text));
    }

    #[test]
    fn phone_bonus_only_for_digits() {
        let phone = field(FieldType::Phone);
        let text = field(FieldType::Text);
        let value = "office 555-1234";
        let digits = [MatchSpan::new(11, 15)];
        assert!(approx(
            score_field(&digits, &phone, value, "1234") - score_field(&digits, &text, value, "1234"),
            0.2
        ));

        let punctuated = [MatchSpan::new(7, 14)];
        assert!(approx(
            score_field(&punctuated, &phone, value, "555-123"),
            score_field(&punctuated, &text, value, "555-123"),
        ));
    }

    #[test]
    fn exact_bonus_only_when_query_contained() {
        let f = field(FieldType::Text);
        let spans = [MatchSpan::new(0, 4)];
        let with = score_field(&spans, &f, "john smith", "john");
        let without = score_field(&spans, &f, "john smith", "jon");
        assert!(approx(with - without, 0.3));
    }
}
