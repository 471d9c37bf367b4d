//! Configuration for searching and for the interactive controller.
//!
//! [`SearchOptions`] holds the tunables; [`SearchConfig`] bundles them with a
//! field schema so both can be loaded from one JSON document. Validation
//! runs here, once, and never inside the ranking hot path.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::SearchField;

/// Tunables for ranking, suggestions, and the controller's timers.
///
/// # Defaults
///
/// - `max_results`: `100`
/// - `min_score`: `0.1`
/// - `debounce_ms`: `300`
/// - `show_suggestions`: `true`
/// - `blur_delay_ms`: `150`
/// - `history_capacity`: `10`
/// - `max_suggestions`: `8`
/// - `chunk_size`: `None` (rank the whole dataset in one step)
///
/// # Examples
///
/// ```
/// use fieldsearch::SearchOptions;
///
/// let opts = SearchOptions::default();
/// assert_eq!(opts.max_results, 100);
///
/// let opts: SearchOptions = serde_json::from_str(r#"{ "min_score": 0.5 }"#).unwrap();
/// assert_eq!(opts.min_score, 0.5);
/// assert_eq!(opts.debounce_ms, 300);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum number of results returned by one search.
    pub max_results: usize,
    /// Items whose total score falls below this are dropped.
    pub min_score: f64,
    /// Quiet period after the last keystroke before a search runs.
    pub debounce_ms: u64,
    /// When `false`, the controller never computes suggestions or opens
    /// the dropdown.
    pub show_suggestions: bool,
    /// Grace period between losing focus and closing the dropdown, so a
    /// click on a suggestion still lands.
    pub blur_delay_ms: u64,
    /// Number of past queries kept in the search history.
    pub history_capacity: usize,
    /// Maximum number of suggestions offered at once.
    pub max_suggestions: usize,
    /// When set, the controller ranks this many items per `poll` instead of
    /// the whole dataset at once.
    pub chunk_size: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 100,
            min_score: 0.1,
            debounce_ms: 300,
            show_suggestions: true,
            blur_delay_ms: 150,
            history_capacity: 10,
            max_suggestions: 8,
            chunk_size: None,
        }
    }
}

impl SearchOptions {
    /// Debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Blur grace period as a [`Duration`].
    pub fn blur_delay(&self) -> Duration {
        Duration::from_millis(self.blur_delay_ms)
    }

    /// Check that the options are usable.
    ///
    /// `max_results == 0` is allowed and simply yields no results.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            return Err(ConfigError::InvalidMinScore(self.min_score));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                setting: "history_capacity",
            });
        }
        if self.max_suggestions == 0 {
            return Err(ConfigError::ZeroCapacity {
                setting: "max_suggestions",
            });
        }
        if self.chunk_size == Some(0) {
            return Err(ConfigError::ZeroCapacity {
                setting: "chunk_size",
            });
        }
        Ok(())
    }
}

/// Check a field schema before handing it to the engine.
///
/// Rejects empty keys, keys with empty path segments (`"a..b"`, `".a"`),
/// duplicate keys, and weights that are not finite and positive.
pub fn validate_fields(fields: &[SearchField]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if field.key.is_empty() {
            return Err(ConfigError::EmptyKey { index });
        }
        if field.key.split('.').any(str::is_empty) {
            return Err(ConfigError::MalformedKey {
                key: field.key.clone(),
            });
        }
        if !seen.insert(field.key.as_str()) {
            return Err(ConfigError::DuplicateKey {
                key: field.key.clone(),
            });
        }
        if !field.weight.is_finite() || field.weight <= 0.0 {
            return Err(ConfigError::InvalidWeight {
                key: field.key.clone(),
                weight: field.weight,
            });
        }
    }
    Ok(())
}

/// A field schema together with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Searchable record attributes.
    pub fields: Vec<SearchField>,
    /// Ranking and controller tunables.
    #[serde(default)]
    pub options: SearchOptions,
}

impl SearchConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldsearch::{FieldType, SearchConfig};
    ///
    /// let config = SearchConfig::from_json_str(r#"{
    ///     "fields": [
    ///         { "key": "name", "label": "Name", "weight": 2, "type": "text" },
    ///         { "key": "contact.email", "label": "Email", "weight": 1, "type": "email" }
    ///     ],
    ///     "options": { "max_results": 20 }
    /// }"#).unwrap();
    /// assert_eq!(config.fields[1].field_type, FieldType::Email);
    /// assert_eq!(config.options.max_results, 20);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both the schema and the options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_fields(&self.fields)?;
        self.options.validate()
    }
}
