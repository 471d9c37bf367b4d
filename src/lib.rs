#![warn(missing_docs)]

//! Schema-driven multi-field fuzzy search.
//!
//! `fieldsearch` ranks an in-memory collection of records against a query
//! typed by a user. Each record is read through a field schema; every
//! searchable field is matched exactly and, for text, word by word with an
//! edit-distance tolerance, scored, weighted, and summed into the record's
//! total score. A small controller adds debouncing, suggestions, keyboard
//! navigation, and a search history on top.

/// Levenshtein distance and normalized similarity.
pub mod distance;

/// Field schema and dotted-path record access.
pub mod field;

/// Exact and fuzzy match span discovery.
pub mod matching;

/// Per-field match scoring.
pub mod scoring;

/// Ranking a dataset against a query.
pub mod search;

/// Suggestions from history and dataset values.
pub mod suggest;

/// Bounded search history.
pub mod history;

/// Text segmentation for highlighting matches.
pub mod highlight;

/// Interactive search-box state machine.
pub mod controller;

/// Search and controller configuration.
pub mod options;

/// Configuration errors.
pub mod error;

// Re-export primary public API types and functions at the crate root.
pub use controller::{ControllerState, NavKey, ResultsCallback, SearchController};
pub use distance::{levenshtein_distance, similarity};
pub use error::ConfigError;
pub use field::{FieldSource, FieldType, SearchField};
pub use highlight::{Segment, highlight};
pub use history::SearchHistory;
pub use matching::{MatchSpan, PreparedQuery, find_matches, merge_spans};
pub use options::{SearchConfig, SearchOptions, validate_fields};
pub use scoring::score_field;
pub use search::{IncrementalSearch, SearchMatch, SearchResult, search};
pub use suggest::{suggest, suggest_with_limit};
