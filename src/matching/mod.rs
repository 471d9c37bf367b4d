//! Exact and fuzzy match span discovery.
//!
//! Given a lower-cased field value and the terms of a query, this module
//! finds the character ranges that satisfy the query and merges them into a
//! sorted, non-overlapping list suitable for scoring and highlighting.

use memchr::memmem::Finder;
use serde::{Deserialize, Serialize};

use crate::distance::similarity;
use crate::field::{FieldType, SearchField};

/// Terms shorter than this are ignored for exact matching.
pub const MIN_EXACT_TERM_CHARS: usize = 2;

/// Terms shorter than this never trigger word-level fuzzy matching.
pub const MIN_FUZZY_TERM_CHARS: usize = 3;

/// A word must be strictly more similar than this to a term to match fuzzily.
pub const FUZZY_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Half-open character range `[start, end)` within a normalized field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Index of the first matched character.
    pub start: usize,
    /// Index one past the last matched character.
    pub end: usize,
}

impl MatchSpan {
    /// Create a span covering `[start, end)`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered by the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One query term with its cached exact-match searcher.
pub(crate) struct Term {
    pub(crate) text: String,
    char_len: usize,
    /// `None` for terms too short for exact matching.
    finder: Option<Finder<'static>>,
}

impl Term {
    fn new(text: &str) -> Self {
        let char_len = char_count(text);
        let finder = (char_len >= MIN_EXACT_TERM_CHARS)
            .then(|| Finder::new(text.as_bytes()).into_owned());
        Self {
            text: text.to_owned(),
            char_len,
            finder,
        }
    }
}

/// Query data computed once per search and reused for every item and field.
///
/// Holds the trimmed, lower-cased query and its whitespace-separated terms,
/// each with a SIMD substring searcher ready for the exact-match scan.
pub struct PreparedQuery {
    pub(crate) normalized: String,
    pub(crate) terms: Vec<Term>,
}

impl PreparedQuery {
    /// Normalize `query` (trim, lower-case) and split it into terms.
    pub fn new(query: &str) -> Self {
        let normalized = query.trim().to_lowercase();
        let terms = normalized.split_whitespace().map(Term::new).collect();
        Self { normalized, terms }
    }

    /// The trimmed, lower-cased query.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Returns `true` if the query contains no non-whitespace characters.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// A lower-cased field value that can map its character positions back to
/// the value it was built from.
///
/// Lower-casing may expand a character (`'İ'` becomes `"i\u{307}"`), so
/// positions in the lowered text drift from positions in the original.
pub(crate) struct LoweredValue {
    pub(crate) text: String,
    /// Original char index of each lowered char, or `None` when lowering
    /// kept every character one to one.
    origin: Option<Vec<usize>>,
}

impl LoweredValue {
    pub(crate) fn new(value: &str) -> Self {
        let text = value.to_lowercase();
        if value.is_ascii() {
            return Self { text, origin: None };
        }

        let mut origin = Vec::with_capacity(value.len());
        let mut expanded = false;
        for (index, c) in value.chars().enumerate() {
            let lowered = c.to_lowercase().count();
            expanded |= lowered != 1;
            origin.extend(std::iter::repeat_n(index, lowered));
        }
        // `str::to_lowercase` only differs from per-char lowering in which
        // sigma it picks, never in length.
        debug_assert_eq!(origin.len(), char_count(&text));
        Self {
            text,
            origin: expanded.then_some(origin),
        }
    }

    /// Translate merged spans over the lowered text into spans over the
    /// original value.
    pub(crate) fn to_original(&self, spans: Vec<MatchSpan>) -> Vec<MatchSpan> {
        let Some(origin) = &self.origin else {
            return spans;
        };
        let translated = spans
            .into_iter()
            .filter(|s| !s.is_empty())
            .filter_map(|s| {
                let start = *origin.get(s.start)?;
                let last = *origin.get(s.end - 1)?;
                Some(MatchSpan::new(start, last + 1))
            })
            .collect();
        merge_spans(translated)
    }
}

/// Find exact and fuzzy match spans of `query_terms` in `normalized_value`.
///
/// - Every non-overlapping exact occurrence of each term of at least two
///   characters is reported, scanning left to right.
/// - For [`FieldType::Text`] fields, each term of at least three characters
///   is also compared against every whitespace-delimited word of the value;
///   words with similarity above `0.7` are reported in full.
///
/// The spans are merged (see [`merge_spans`]) before returning, so the result
/// is sorted by `start` and free of overlaps. Both the value and the terms
/// are expected to be lower-cased already.
///
/// # Examples
///
/// ```
/// use fieldsearch::{MatchSpan, SearchField, find_matches};
///
/// let field = SearchField::new("name", "Name", 1.0);
/// let spans = find_matches("john smith", &["jon"], &field);
/// assert_eq!(spans, vec![MatchSpan::new(0, 4)]);
///
/// let spans = find_matches("anna and hannah", &["an"], &field);
/// assert_eq!(spans.len(), 3);
/// ```
pub fn find_matches<S: AsRef<str>>(
    normalized_value: &str,
    query_terms: &[S],
    field: &SearchField,
) -> Vec<MatchSpan> {
    let terms: Vec<Term> = query_terms
        .iter()
        .flat_map(|t| t.as_ref().split_whitespace())
        .map(Term::new)
        .collect();
    find_matches_prepared(normalized_value, &terms, field.field_type)
}

/// Hot-path variant of [`find_matches`] that reuses prepared terms.
pub(crate) fn find_matches_prepared(
    normalized_value: &str,
    terms: &[Term],
    field_type: FieldType,
) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    let fuzzy = field_type == FieldType::Text;
    let mut words: Option<Vec<Word<'_>>> = None;

    for term in terms {
        if let Some(finder) = &term.finder {
            for byte_pos in finder.find_iter(normalized_value.as_bytes()) {
                let start = char_offset(normalized_value, byte_pos);
                spans.push(MatchSpan::new(start, start + term.char_len));
            }
        }

        if fuzzy && term.char_len >= MIN_FUZZY_TERM_CHARS {
            let words = words.get_or_insert_with(|| split_words(normalized_value));
            for word in words.iter() {
                if similarity(word.text, &term.text) > FUZZY_SIMILARITY_THRESHOLD {
                    spans.push(MatchSpan::new(word.start, word.start + word.char_len));
                }
            }
        }
    }

    merge_spans(spans)
}

/// Sort spans by start and coalesce any that overlap or touch.
///
/// A span whose `start` is at or before the running span's `end` is folded
/// into it, extending `end` to the larger of the two.
///
/// # Examples
///
/// ```
/// use fieldsearch::{MatchSpan, merge_spans};
///
/// let merged = merge_spans(vec![
///     MatchSpan::new(5, 8),
///     MatchSpan::new(0, 3),
///     MatchSpan::new(2, 4),
///     MatchSpan::new(8, 9),
/// ]);
/// assert_eq!(merged, vec![MatchSpan::new(0, 4), MatchSpan::new(5, 9)]);
/// ```
pub fn merge_spans(mut spans: Vec<MatchSpan>) -> Vec<MatchSpan> {
    if spans.len() < 2 {
        return spans;
    }
    spans.sort_by_key(|s| s.start);

    let mut merged: Vec<MatchSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(current) if span.start <= current.end => {
                current.end = current.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// A whitespace-delimited word and its character position.
struct Word<'a> {
    text: &'a str,
    start: usize,
    char_len: usize,
}

/// Split `s` on whitespace, remembering where each word starts in chars.
fn split_words(s: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut word_start: Option<(usize, usize)> = None;
    let mut char_index = 0;

    for (byte_index, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some((byte_start, char_start)) = word_start.take() {
                words.push(Word {
                    text: &s[byte_start..byte_index],
                    start: char_start,
                    char_len: char_index - char_start,
                });
            }
        } else if word_start.is_none() {
            word_start = Some((byte_index, char_index));
        }
        char_index += 1;
    }
    if let Some((byte_start, char_start)) = word_start {
        words.push(Word {
            text: &s[byte_start..],
            start: char_start,
            char_len: char_index - char_start,
        });
    }
    words
}

/// Number of characters in `s`, with an ASCII fast path.
pub(crate) fn char_count(s: &str) -> usize {
    if s.is_ascii() {
        s.len()
    } else {
        s.chars().count()
    }
}

/// Convert a byte offset into `s` to a character offset.
fn char_offset(s: &str, byte_pos: usize) -> usize {
    char_count(&s[..byte_pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field() -> SearchField {
        SearchField::new("name", "Name", 1.0)
    }

    fn email_field() -> SearchField {
        SearchField::new("email", "Email", 1.0).with_type(FieldType::Email)
    }

    #[test]
    fn exact_match_single_occurrence() {
        let spans = find_matches("jane@x.com", &["x.com"], &email_field());
        assert_eq!(spans, vec![MatchSpan::new(5, 10)]);
    }

    #[test]
    fn exact_match_every_occurrence() {
        let spans = find_matches("abcab abc", &["ab"], &email_field());
        assert_eq!(
            spans,
            vec![
                MatchSpan::new(0, 2),
                MatchSpan::new(3, 5),
                MatchSpan::new(6, 8),
            ]
        );
    }

    #[test]
    fn exact_match_occurrences_do_not_overlap() {
        // "aa" in "aaaa" is found at 0 and 2, not at 1.
        let spans = find_matches("aaaa", &["aa"], &email_field());
        // The two occurrences touch and are merged.
        assert_eq!(spans, vec![MatchSpan::new(0, 4)]);
    }

    #[test]
    fn single_char_terms_are_ignored() {
        assert!(find_matches("jane doe", &["j"], &text_field()).is_empty());
    }

    #[test]
    fn fuzzy_word_match_on_text_field() {
        let spans = find_matches("john smith", &["jon"], &text_field());
        assert_eq!(spans, vec![MatchSpan::new(0, 4)]);
    }

    #[test]
    fn fuzzy_not_applied_to_non_text_fields() {
        assert!(find_matches("john@x.com", &["jon"], &email_field()).is_empty());
    }

    #[test]
    fn fuzzy_requires_three_chars() {
        // "jo" is a substring so it matches exactly, but "jn" is neither a
        // substring nor long enough to match fuzzily.
        assert!(find_matches("john", &["jn"], &text_field()).is_empty());
    }

    #[test]
    fn fuzzy_uses_word_position_for_repeated_words() {
        let spans = find_matches("smyth and smyth", &["smith"], &text_field());
        assert_eq!(spans, vec![MatchSpan::new(0, 5), MatchSpan::new(10, 15)]);
    }

    #[test]
    fn exact_and_fuzzy_spans_are_merged() {
        // "smit" matches exactly at 5..9 and fuzzily against "smith" at 5..10.
        let spans = find_matches("john smith", &["smit"], &text_field());
        assert_eq!(spans, vec![MatchSpan::new(5, 10)]);
    }

    #[test]
    fn multiple_terms() {
        let spans = find_matches("john smith", &["john", "smith"], &text_field());
        assert_eq!(spans, vec![MatchSpan::new(0, 4), MatchSpan::new(5, 10)]);
    }

    #[test]
    fn terms_with_inner_whitespace_are_split() {
        let spans = find_matches("john smith", &["john smith"], &email_field());
        assert_eq!(spans, vec![MatchSpan::new(0, 4), MatchSpan::new(5, 10)]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(find_matches("jane doe", &["xyz"], &text_field()).is_empty());
    }

    #[test]
    fn spans_use_char_offsets() {
        // "é" is two bytes; the span for "ab" must start at char 2.
        let spans = find_matches("\u{00e9} ab", &["ab"], &email_field());
        assert_eq!(spans, vec![MatchSpan::new(2, 4)]);
    }

    #[test]
    fn merge_keeps_disjoint_spans() {
        let merged = merge_spans(vec![MatchSpan::new(4, 6), MatchSpan::new(0, 2)]);
        assert_eq!(merged, vec![MatchSpan::new(0, 2), MatchSpan::new(4, 6)]);
    }

    #[test]
    fn merge_contained_span() {
        let merged = merge_spans(vec![MatchSpan::new(0, 10), MatchSpan::new(2, 4)]);
        assert_eq!(merged, vec![MatchSpan::new(0, 10)]);
    }

    #[test]
    fn merge_empty_and_single() {
        assert!(merge_spans(Vec::new()).is_empty());
        assert_eq!(
            merge_spans(vec![MatchSpan::new(1, 2)]),
            vec![MatchSpan::new(1, 2)]
        );
    }

    #[test]
    fn split_words_positions() {
        let words = split_words("  ab  cde f");
        let positions: Vec<(&str, usize, usize)> =
            words.iter().map(|w| (w.text, w.start, w.char_len)).collect();
        assert_eq!(positions, vec![("ab", 2, 2), ("cde", 6, 3), ("f", 10, 1)]);
    }

    #[test]
    fn lowered_ascii_keeps_positions() {
        let lowered = LoweredValue::new("John SMITH");
        assert_eq!(lowered.text, "john smith");
        let spans = vec![MatchSpan::new(5, 10)];
        assert_eq!(lowered.to_original(spans.clone()), spans);
    }

    #[test]
    fn lowered_expansion_maps_back() {
        // 'İ' lower-cases to two chars, shifting everything after it.
        let lowered = LoweredValue::new("İnci Smith");
        assert_eq!(char_count(&lowered.text), 11);
        let spans = find_matches_prepared(
            &lowered.text,
            &PreparedQuery::new("smith").terms,
            FieldType::Text,
        );
        assert_eq!(spans, vec![MatchSpan::new(6, 11)]);
        assert_eq!(lowered.to_original(spans), vec![MatchSpan::new(5, 10)]);
    }

    #[test]
    fn lowered_span_over_expanded_char() {
        let lowered = LoweredValue::new("İstanbul");
        let spans = find_matches_prepared(
            &lowered.text,
            &PreparedQuery::new("İst").terms,
            FieldType::Number,
        );
        assert_eq!(spans, vec![MatchSpan::new(0, 4)]);
        assert_eq!(lowered.to_original(spans), vec![MatchSpan::new(0, 3)]);
    }

    #[test]
    fn prepared_query_normalizes() {
        let pq = PreparedQuery::new("  John SMITH ");
        assert_eq!(pq.normalized(), "john smith");
        let terms: Vec<&str> = pq.terms.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(terms, vec!["john", "smith"]);
        assert!(PreparedQuery::new("   ").is_empty());
    }
}
