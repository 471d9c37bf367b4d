//! Search-as-you-type suggestions.
//!
//! Suggestions come from two places: earlier queries in the history, and
//! values (or single words of long values) found in the dataset's searchable
//! fields.

use std::collections::HashSet;

use crate::field::{FieldSource, SearchField};
use crate::matching::char_count;

/// Default cap on the number of suggestions.
pub const MAX_SUGGESTIONS: usize = 8;

/// Number of history entries offered for a query too short to filter on.
pub const RECENT_HISTORY_SUGGESTIONS: usize = 5;

/// Field values up to this many characters are suggested whole; longer
/// values contribute matching words instead.
pub const MAX_WHOLE_VALUE_CHARS: usize = 50;

/// Queries shorter than this (after trimming) only get recent history.
pub const MIN_SUGGEST_QUERY_CHARS: usize = 2;

/// Suggest completions for `query`, capped at [`MAX_SUGGESTIONS`].
///
/// See [`suggest_with_limit`] for the rules.
///
/// # Examples
///
/// ```
/// use fieldsearch::{SearchField, suggest};
/// use serde_json::json;
///
/// let data = vec![json!({ "company": "Acme Rockets" }), json!({ "company": "Acme Anvils" })];
/// let fields = vec![SearchField::new("company", "Company", 1.0)];
/// let history = vec!["acme rockets".to_owned()];
///
/// let suggestions = suggest("acme", &history, &data, &fields);
/// assert_eq!(suggestions, ["acme rockets", "Acme Rockets", "Acme Anvils"]);
/// ```
pub fn suggest<T: FieldSource>(
    query: &str,
    history: &[String],
    dataset: &[T],
    fields: &[SearchField],
) -> Vec<String> {
    suggest_with_limit(query, history, dataset, fields, MAX_SUGGESTIONS)
}

/// Suggest at most `limit` completions for `query`.
///
/// - A query shorter than two characters yields up to five most recent
///   history entries, unchanged.
/// - Otherwise the candidates are, in order: history entries containing the
///   query; whole field values of at most 50 characters containing the
///   query; and words of longer field values that contain the query.
///   Matching is case-insensitive, duplicates are dropped, and the first
///   `limit` candidates are returned.
pub fn suggest_with_limit<T: FieldSource>(
    query: &str,
    history: &[String],
    dataset: &[T],
    fields: &[SearchField],
    limit: usize,
) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    let needle_len = char_count(&needle);
    if needle_len < MIN_SUGGEST_QUERY_CHARS {
        return history
            .iter()
            .take(RECENT_HISTORY_SUGGESTIONS.min(limit))
            .cloned()
            .collect();
    }

    let mut collector = Collector::new(limit);

    for entry in history {
        if entry.to_lowercase().contains(&needle) && collector.push(entry) {
            return collector.into_vec();
        }
    }

    for field in fields.iter().filter(|f| f.searchable) {
        for item in dataset {
            let Some(value) = item.field_value(&field.key) else {
                continue;
            };
            let lower = value.to_lowercase();
            if !lower.contains(&needle) {
                continue;
            }

            if char_count(&value) <= MAX_WHOLE_VALUE_CHARS {
                if collector.push(&value) {
                    return collector.into_vec();
                }
                continue;
            }

            for word in value.split_whitespace() {
                if char_count(word) >= needle_len
                    && word.to_lowercase().contains(&needle)
                    && collector.push(word)
                {
                    return collector.into_vec();
                }
            }
        }
    }

    collector.into_vec()
}

/// Insertion-ordered, de-duplicating accumulator with a hard cap.
struct Collector {
    items: Vec<String>,
    seen: HashSet<String>,
    limit: usize,
}

impl Collector {
    fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    /// Add `candidate` unless already present. Returns `true` once full.
    fn push(&mut self, candidate: &str) -> bool {
        if self.items.len() < self.limit && self.seen.insert(candidate.to_owned()) {
            self.items.push(candidate.to_owned());
        }
        self.items.len() >= self.limit
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}
