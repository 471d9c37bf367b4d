//! Ranking a dataset against a query.
//!
//! [`search`] scores every item over every searchable field, keeps items
//! that clear the minimum score, and returns them best first. The same
//! pipeline is available step by step through [`IncrementalSearch`] for
//! datasets too large to rank within one event-loop turn.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, trace};

use crate::field::{FieldSource, SearchField};
use crate::matching::{LoweredValue, MatchSpan, PreparedQuery, find_matches_prepared};
use crate::options::SearchOptions;
use crate::scoring::score_field;

/// How one field of an item matched the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    /// Key of the matched field.
    pub field: String,
    /// The field value as stored in the record.
    pub value: String,
    /// Field score in `[0.0, 1.0]`, before weighting.
    pub score: f64,
    /// Merged character spans within `value`, ready for
    /// [`highlight`](crate::highlight::highlight).
    pub highlights: Vec<MatchSpan>,
}

/// An item that matched the query, with its per-field detail.
///
/// `total_score` is the sum of `score * weight` over exactly the fields
/// listed in `matches`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<'d, T> {
    /// The matched item, borrowed from the dataset.
    pub item: &'d T,
    /// Position of the item in the dataset.
    pub index: usize,
    /// Matched fields in schema order; never empty.
    pub matches: Vec<SearchMatch>,
    /// Weighted sum of the field scores.
    pub total_score: f64,
}

/// Rank `dataset` against `query` over the searchable `fields`.
///
/// Returns an empty vector when the query is blank. Otherwise every item is
/// scored field by field; items with at least one matching field and a total
/// score of at least `options.min_score` are kept, sorted by descending
/// total score (ties keep dataset order), and truncated to
/// `options.max_results`.
///
/// # Examples
///
/// ```
/// use fieldsearch::{FieldType, SearchField, SearchOptions, search};
/// use serde_json::json;
///
/// let leads = vec![
///     json!({ "name": "John Smith", "email": "john@x.com" }),
///     json!({ "name": "Jane Doe", "email": "jane@x.com" }),
/// ];
/// let fields = vec![
///     SearchField::new("name", "Name", 1.0),
///     SearchField::new("email", "Email", 1.0).with_type(FieldType::Email),
/// ];
///
/// let results = search(&leads, &fields, "jon", &SearchOptions::default());
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].index, 0);
/// ```
pub fn search<'d, T: FieldSource>(
    dataset: &'d [T],
    fields: &[SearchField],
    query: &str,
    options: &SearchOptions,
) -> Vec<SearchResult<'d, T>> {
    let mut session = IncrementalSearch::new(dataset, fields, query, options);
    session.step(dataset.len());
    session.finish()
}

/// A search that ranks the dataset a slice at a time.
///
/// Call [`step`](Self::step) with an item budget until it reports
/// completion, then [`finish`](Self::finish) to sort and truncate. Dropping
/// the value abandons the search; nothing else needs cancelling.
///
/// # Examples
///
/// ```
/// use fieldsearch::{IncrementalSearch, SearchField, SearchOptions, search};
/// use serde_json::json;
///
/// let data: Vec<_> = (0..10).map(|i| json!({ "name": format!("lead {i}") })).collect();
/// let fields = vec![SearchField::new("name", "Name", 1.0)];
/// let opts = SearchOptions::default();
///
/// let mut session = IncrementalSearch::new(&data, &fields, "lead", &opts);
/// while !session.step(3) {}
/// assert_eq!(session.finish(), search(&data, &fields, "lead", &opts));
/// ```
pub struct IncrementalSearch<'d, 'f, T> {
    dataset: &'d [T],
    fields: &'f [SearchField],
    query: PreparedQuery,
    min_score: f64,
    max_results: usize,
    cursor: usize,
    kept: Vec<SearchResult<'d, T>>,
}

impl<'d, 'f, T: FieldSource> IncrementalSearch<'d, 'f, T> {
    /// Prepare a search. No item is scored until [`step`](Self::step).
    pub fn new(
        dataset: &'d [T],
        fields: &'f [SearchField],
        query: &str,
        options: &SearchOptions,
    ) -> Self {
        let query = PreparedQuery::new(query);
        // A blank query matches nothing, so there is nothing to scan.
        let cursor = if query.is_empty() { dataset.len() } else { 0 };
        Self {
            dataset,
            fields,
            query,
            min_score: options.min_score,
            max_results: options.max_results,
            cursor,
            kept: Vec::new(),
        }
    }

    /// Score up to `budget` more items. Returns `true` once every item has
    /// been scored.
    pub fn step(&mut self, budget: usize) -> bool {
        let dataset = self.dataset;
        let end = self.cursor.saturating_add(budget).min(dataset.len());
        for index in self.cursor..end {
            let item = &dataset[index];
            if let Some(result) = score_item(item, index, self.fields, &self.query) {
                if result.total_score >= self.min_score {
                    self.kept.push(result);
                }
            }
        }
        trace!(from = self.cursor, to = end, kept = self.kept.len(), "search step");
        self.cursor = end;
        self.is_done()
    }

    /// Returns `true` once every item has been scored.
    pub fn is_done(&self) -> bool {
        self.cursor >= self.dataset.len()
    }

    /// Fraction of the dataset scored so far, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.dataset.is_empty() {
            1.0
        } else {
            self.cursor as f64 / self.dataset.len() as f64
        }
    }

    /// The trimmed, lower-cased query being ranked.
    pub fn query(&self) -> &str {
        self.query.normalized()
    }

    /// Sort the kept items and truncate to the result cap.
    ///
    /// Items not yet reached by [`step`](Self::step) are not included.
    pub fn finish(self) -> Vec<SearchResult<'d, T>> {
        let mut results = self.kept;
        let candidates = results.len();
        // `sort_by` is stable, so equal scores keep dataset order.
        results.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(Ordering::Equal)
        });
        results.truncate(self.max_results);
        debug!(
            query = self.query.normalized(),
            scanned = self.cursor,
            candidates,
            returned = results.len(),
            "search completed"
        );
        results
    }
}

/// Score one item over every searchable field.
///
/// Returns `None` when no field matched.
fn score_item<'d, T: FieldSource>(
    item: &'d T,
    index: usize,
    fields: &[SearchField],
    query: &PreparedQuery,
) -> Option<SearchResult<'d, T>> {
    let mut matches = Vec::new();
    let mut total_score = 0.0;

    for field in fields.iter().filter(|f| f.searchable) {
        let Some(value) = item.field_value(&field.key) else {
            continue;
        };
        let lowered = LoweredValue::new(&value);
        let spans = find_matches_prepared(&lowered.text, &query.terms, field.field_type);
        if spans.is_empty() {
            continue;
        }

        let score = score_field(&spans, field, &lowered.text, &query.normalized);
        total_score += score * field.weight;
        matches.push(SearchMatch {
            field: field.key.clone(),
            value: value.into_owned(),
            score,
            highlights: lowered.to_original(spans),
        });
    }

    if matches.is_empty() {
        None
    } else {
        Some(SearchResult {
            item,
            index,
            matches,
            total_score,
        })
    }
}
