//! Configuration errors.
//!
//! Searching never fails; only building a controller or loading a
//! configuration validates its input and can return a [`ConfigError`].

use thiserror::Error;

/// A problem with a field schema or with search options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field was declared with an empty key.
    #[error("field #{index} has an empty key")]
    EmptyKey {
        /// Position of the field in the schema.
        index: usize,
    },
    /// A dotted key has an empty segment, e.g. `"a..b"`.
    #[error("field key `{key}` contains an empty path segment")]
    MalformedKey {
        /// The offending key.
        key: String,
    },
    /// Two fields share a key.
    #[error("field key `{key}` is declared more than once")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// A weight is zero, negative, or not finite.
    #[error("field `{key}` has weight {weight}; weights must be finite and greater than zero")]
    InvalidWeight {
        /// Key of the field.
        key: String,
        /// The rejected weight.
        weight: f64,
    },
    /// `min_score` is negative or not finite.
    #[error("min_score must be a finite, non-negative number, got {0}")]
    InvalidMinScore(f64),
    /// A capacity-like setting is zero.
    #[error("`{setting}` must be greater than zero")]
    ZeroCapacity {
        /// Name of the setting.
        setting: &'static str,
    },
    /// The configuration document is not valid JSON for [`SearchConfig`](crate::SearchConfig).
    #[error("failed to parse search configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
