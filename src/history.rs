//! Bounded, de-duplicated history of accepted queries.

use std::slice;

/// Default number of entries kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Past queries, most recent first.
///
/// Pushing a query that is already present moves it to the front instead of
/// adding a second copy; the oldest entries fall off once the capacity is
/// exceeded.
///
/// # Examples
///
/// ```
/// use fieldsearch::SearchHistory;
///
/// let mut history = SearchHistory::default();
/// history.push("acme");
/// history.push("globex");
/// history.push("acme");
/// assert_eq!(history.entries(), ["acme", "globex"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
    capacity: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SearchHistory {
    /// Create an empty history holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Record `query` as the most recent entry.
    ///
    /// Any identical entry is removed first, then the query is prepended and
    /// the list truncated to capacity.
    pub fn push(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.entries.retain(|entry| *entry != query);
        self.entries.insert(0, query);
        self.entries.truncate(self.capacity);
    }

    /// All entries, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Up to `n` most recent entries.
    pub fn recent(&self, n: usize) -> &[String] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Iterate over entries, most recent first.
    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.entries.iter()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no query has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a SearchHistory {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
