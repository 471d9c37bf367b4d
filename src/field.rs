//! Field schema and record access.
//!
//! A [`SearchField`] names one attribute of a record by dotted path and says
//! how much it matters for ranking. Records are read exclusively through the
//! [`FieldSource`] trait, which resolves a path to an optional string.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic type of a searchable field.
///
/// The type decides whether word-level fuzzy matching runs (`Text` only)
/// and which type-specific score bonus applies (`Email`, `Phone`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text such as names or company titles.
    #[default]
    Text,
    /// An email address.
    Email,
    /// A phone number.
    Phone,
    /// A numeric value, matched as its string form.
    Number,
}

/// Description of one record attribute the engine may search.
///
/// # Examples
///
/// ```
/// use fieldsearch::{FieldType, SearchField};
///
/// let field = SearchField::new("contact.email", "Email", 2.0).with_type(FieldType::Email);
/// assert!(field.searchable);
/// assert_eq!(field.field_type, FieldType::Email);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchField {
    /// Dotted path into the record, e.g. `"company.name"`.
    pub key: String,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Relative importance; multiplied into the item's total score.
    pub weight: f64,
    /// Fields with `searchable == false` are ignored by search and suggestions.
    #[serde(default = "default_searchable")]
    pub searchable: bool,
    /// Semantic type of the field value.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

fn default_searchable() -> bool {
    true
}

impl SearchField {
    /// Create a searchable text field.
    pub fn new(key: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            weight,
            searchable: true,
            field_type: FieldType::Text,
        }
    }

    /// Set the field type.
    #[must_use]
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Mark the field as excluded from (or included in) search.
    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }
}

/// A record the engine can read field values from.
///
/// Implementors resolve a dotted path to the field's value as a string, or
/// `None` when the value is absent. Values of other runtime types should be
/// coerced to their string form rather than rejected.
///
/// # Built-in Implementations
///
/// - [`serde_json::Value`] -- dotted path lookup via [`resolve_path`]
/// - [`HashMap<String, String>`] and [`BTreeMap<String, String>`] -- the whole
///   path is used as the map key
/// - `&T` for any `T: FieldSource`
pub trait FieldSource {
    /// Returns the value stored under `path`, if any.
    fn field_value(&self, path: &str) -> Option<Cow<'_, str>>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field_value(&self, path: &str) -> Option<Cow<'_, str>> {
        (**self).field_value(path)
    }
}

impl FieldSource for Value {
    fn field_value(&self, path: &str) -> Option<Cow<'_, str>> {
        resolve_path(self, path).and_then(coerce_to_string)
    }
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, path: &str) -> Option<Cow<'_, str>> {
        self.get(path).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field_value(&self, path: &str) -> Option<Cow<'_, str>> {
        self.get(path).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// Walk a dotted `path` through a JSON value.
///
/// Each segment selects an object member by name, or an array element when
/// the segment parses as an index. Returns `None` as soon as a segment is
/// missing or the current value is `null`.
///
/// # Examples
///
/// ```
/// use fieldsearch::field::resolve_path;
/// use serde_json::json;
///
/// let lead = json!({ "company": { "name": "Acme" }, "tags": ["hot", "b2b"] });
/// assert_eq!(resolve_path(&lead, "company.name"), Some(&json!("Acme")));
/// assert_eq!(resolve_path(&lead, "tags.1"), Some(&json!("b2b")));
/// assert_eq!(resolve_path(&lead, "company.size"), None);
/// ```
pub fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

/// Coerce a resolved JSON value to the string the matcher sees.
fn coerce_to_string(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Array(_) => None,
                    other => coerce_to_string(other).map(Cow::into_owned),
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(Cow::Owned(parts.join(", ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_string_is_borrowed() {
        let record = json!({ "contact": { "email": "a@b.co" } });
        let value = record.field_value("contact.email");
        assert_eq!(value.as_deref(), Some("a@b.co"));
        assert!(matches!(value, Some(Cow::Borrowed(_))));
    }

    #[test]
    fn null_anywhere_in_path_is_absent() {
        let record = json!({ "contact": null, "name": null });
        assert_eq!(record.field_value("contact.email"), None);
        assert_eq!(record.field_value("name"), None);
    }

    #[test]
    fn missing_segment_is_absent() {
        let record = json!({ "contact": { "phone": "555" } });
        assert_eq!(record.field_value("contact.email"), None);
        assert_eq!(record.field_value("nope"), None);
        // Path descends through a scalar.
        assert_eq!(record.field_value("contact.phone.area"), None);
    }

    #[test]
    fn numbers_and_bools_are_coerced() {
        let record = json!({ "score": 42, "ratio": 0.5, "active": true });
        assert_eq!(record.field_value("score").as_deref(), Some("42"));
        assert_eq!(record.field_value("ratio").as_deref(), Some("0.5"));
        assert_eq!(record.field_value("active").as_deref(), Some("true"));
    }

    #[test]
    fn scalar_arrays_are_joined() {
        let record = json!({ "tags": ["hot", "b2b", 3] });
        assert_eq!(record.field_value("tags").as_deref(), Some("hot, b2b, 3"));
    }

    #[test]
    fn objects_are_absent() {
        let record = json!({ "company": { "name": "Acme" } });
        assert_eq!(record.field_value("company"), None);
    }

    #[test]
    fn array_index_segment() {
        let record = json!({ "emails": ["first@x.com", "second@x.com"] });
        assert_eq!(
            record.field_value("emails.1").as_deref(),
            Some("second@x.com")
        );
        assert_eq!(record.field_value("emails.x"), None);
        assert_eq!(record.field_value("emails.9"), None);
    }

    #[test]
    fn string_maps_use_whole_key() {
        let mut map = HashMap::new();
        map.insert("company.name".to_owned(), "Acme".to_owned());
        assert_eq!(map.field_value("company.name").as_deref(), Some("Acme"));

        let mut tree = BTreeMap::new();
        tree.insert("name".to_owned(), "Jane".to_owned());
        assert_eq!(tree.field_value("name").as_deref(), Some("Jane"));
        assert_eq!(tree.field_value("email"), None);
    }

    #[test]
    fn field_deserializes_with_defaults() {
        let field: SearchField =
            serde_json::from_value(json!({ "key": "email", "weight": 2, "type": "email" }))
                .unwrap();
        assert_eq!(field.key, "email");
        assert_eq!(field.label, "");
        assert!(field.searchable);
        assert_eq!(field.field_type, FieldType::Email);
        assert_eq!(field.weight, 2.0);
    }

    #[test]
    fn builder_methods() {
        let field = SearchField::new("phone", "Phone", 1.5)
            .with_type(FieldType::Phone)
            .searchable(false);
        assert_eq!(field.field_type, FieldType::Phone);
        assert!(!field.searchable);
    }
}
