//! Exact-field filters for document store lookups
//!
//! The store supports nothing fancier than "every listed field equals this
//! value"; this module is that contract made explicit. Filters are built by
//! the entity key types and consumed by every store backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A stored record: field name to JSON value.
///
/// Documents are schemaless at the store level; typed entity structs are
/// (de)serialized through this representation at the adapter boundary.
pub type Document = serde_json::Map<String, Value>;

/// An exact-field filter over documents.
///
/// A document matches when every field listed here is present and equal.
/// An empty filter matches everything. Field order is kept stable
/// (BTreeMap) so filter display and store iteration are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    fields: BTreeMap<String, Value>,
}

impl Filter {
    /// Create an empty filter (matches every document).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Whether the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether `doc` satisfies every condition.
    pub fn matches(&self, doc: &Document) -> bool {
        self.fields
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }

    /// Iterate over the (field, value) conditions.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, value) in &self.fields {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", field, value)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, &str)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&doc(&[("name", "Albany")])));
        assert!(filter.matches(&Document::new()));
    }

    #[test]
    fn test_all_fields_must_match() {
        let filter = Filter::new().eq("code", "NY").eq("country_code", "USA");

        assert!(filter.matches(&doc(&[("code", "NY"), ("country_code", "USA")])));
        assert!(!filter.matches(&doc(&[("code", "NY"), ("country_code", "CAN")])));
        assert!(!filter.matches(&doc(&[("code", "NY")])));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let filter = Filter::new().eq("capital", "Paris");
        assert!(!filter.matches(&Document::new()));
    }

    #[test]
    fn test_display_is_deterministic() {
        let a = Filter::new().eq("b", "2").eq("a", "1");
        let b = Filter::new().eq("a", "1").eq("b", "2");
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "a=\"1\", b=\"2\"");
    }
}
