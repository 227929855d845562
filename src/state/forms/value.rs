//! Field value payloads

use std::collections::BTreeMap;
use std::rc::Rc;

/// Opaque value held by a form control
///
/// Composite variants are shared allocations: cloning a `FieldValue::List`
/// hands out the same list, while building a new list with equal contents
/// produces a different one.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Rc<[FieldValue]>),
    Map(Rc<BTreeMap<String, FieldValue>>),
}

impl FieldValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Create a list value backed by a fresh allocation
    pub fn list(items: impl IntoIterator<Item = FieldValue>) -> Self {
        FieldValue::List(items.into_iter().collect())
    }

    /// Create a map value backed by a fresh allocation
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, FieldValue)>) -> Self {
        FieldValue::Map(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Strict identity comparison used for change detection.
    ///
    /// Primitives compare by value (`NaN` never matches itself). Lists and maps
    /// compare by allocation, so a rebuilt but structurally equal list counts
    /// as different. This is a known coarse-equality limitation; use `==` for
    /// structural comparison.
    pub fn is_same(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::List(a), FieldValue::List(b)) => Rc::ptr_eq(a, b),
            (FieldValue::Map(a), FieldValue::Map(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Get the text value (returns empty string for non-text values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Length used by length validators: characters for text, items for
    /// lists and maps, `None` for everything else
    pub fn len(&self) -> Option<usize> {
        match self {
            FieldValue::Text(s) => Some(s.chars().count()),
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Whether the value counts as "not filled in"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            other => other.len() == Some(0),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::display_value)
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| format!("{k}: {}", v.display_value()))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => FieldValue::Text(s),
            serde_json::Value::Array(items) => {
                FieldValue::list(items.into_iter().map(FieldValue::from))
            }
            serde_json::Value::Object(entries) => {
                FieldValue::map(entries.into_iter().map(|(k, v)| (k, FieldValue::from(v))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod strict_comparison {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_primitives_compare_by_value() {
            assert!(FieldValue::text("John").is_same(&FieldValue::text("John")));
            assert!(FieldValue::from(3u32).is_same(&FieldValue::Number(3.0)));
            assert!(FieldValue::Null.is_same(&FieldValue::Null));
            assert!(!FieldValue::text("John").is_same(&FieldValue::text("Jane")));
        }

        #[test]
        fn test_different_variants_never_match() {
            assert!(!FieldValue::text("1").is_same(&FieldValue::Number(1.0)));
            assert!(!FieldValue::Null.is_same(&FieldValue::Bool(false)));
        }

        #[test]
        fn test_nan_is_never_same() {
            let nan = FieldValue::Number(f64::NAN);
            assert!(!nan.is_same(&nan.clone()));
        }

        #[test]
        fn test_cloned_list_is_same() {
            let tags = FieldValue::list(["a".into(), "b".into()]);
            assert!(tags.is_same(&tags.clone()));
        }

        #[test]
        fn test_rebuilt_list_is_not_same_but_equal() {
            let first = FieldValue::list(["a".into(), "b".into()]);
            let second = FieldValue::list(["a".into(), "b".into()]);
            assert!(!first.is_same(&second));
            assert_eq!(first, second);
        }

        #[test]
        fn test_rebuilt_map_is_not_same() {
            let first = FieldValue::map([("city", FieldValue::text("Oslo"))]);
            let second = FieldValue::map([("city", FieldValue::text("Oslo"))]);
            assert!(!first.is_same(&second));
            assert!(first.is_same(&first.clone()));
        }
    }

    mod accessors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_len_and_empty() {
            assert_eq!(FieldValue::text("héllo").len(), Some(5));
            assert_eq!(FieldValue::Bool(true).len(), None);
            assert!(FieldValue::Null.is_empty());
            assert!(FieldValue::text("").is_empty());
            assert!(FieldValue::list([]).is_empty());
            assert!(!FieldValue::Number(0.0).is_empty());
        }

        #[test]
        fn test_display_value() {
            assert_eq!(FieldValue::Null.display_value(), "");
            assert_eq!(FieldValue::from(2u32).display_value(), "2");
            assert_eq!(
                FieldValue::list(["bug".into(), "ui".into()]).display_value(),
                "bug, ui"
            );
        }

        #[test]
        fn test_as_text_on_non_text() {
            assert_eq!(FieldValue::Number(1.0).as_text(), "");
        }
    }

    mod json_conversion {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_from_json_nested() {
            let value = FieldValue::from(json!({
                "name": "John",
                "tags": ["a", "b"],
                "age": 42,
                "active": true,
                "extra": null
            }));

            let expected = FieldValue::map([
                ("active", FieldValue::Bool(true)),
                ("age", FieldValue::Number(42.0)),
                ("extra", FieldValue::Null),
                ("name", FieldValue::text("John")),
                ("tags", FieldValue::list(["a".into(), "b".into()])),
            ]);
            assert_eq!(value, expected);
        }
    }
}
