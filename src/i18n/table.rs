//! Translation tables: flattened key→text maps for one (locale, namespace).

use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap())
}

/// Key→text mapping with nested objects flattened into dot-separated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a JSON document.
    ///
    /// Nested objects become dot paths (`{"a":{"b":"x"}}` → `a.b`). Numbers
    /// and booleans are kept in their string form; arrays and nulls are
    /// skipped. The root must be an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut entries = HashMap::new();
        for (key, child) in object {
            flatten_into(&mut entries, key.clone(), child);
        }
        Some(Self { entries })
    }

    /// Parse a table from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        Self::from_json(&value).ok_or_else(|| "translation document root must be an object".to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: String, value: &Value) {
    match value {
        Value::String(text) => {
            entries.insert(prefix, text.clone());
        }
        Value::Number(n) => {
            entries.insert(prefix, n.to_string());
        }
        Value::Bool(b) => {
            entries.insert(prefix, b.to_string());
        }
        Value::Object(object) => {
            for (key, child) in object {
                flatten_into(entries, format!("{}.{}", prefix, key), child);
            }
        }
        Value::Array(_) | Value::Null => {}
    }
}

/// Names of the `{placeholder}` markers in a translated string.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    placeholder_regex()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Substitute `{name}` placeholders from `args`; unknown names are left as-is.
pub fn interpolate(text: &str, args: &[(&str, &str)]) -> String {
    if args.is_empty() {
        return text.to_string();
    }

    placeholder_regex()
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            args.iter()
                .find(|(arg, _)| *arg == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_keys() {
        let table = TranslationTable::from_json(&json!({
            "title": "סקייטפארקים",
            "common": { "video": "וידאו", "filters": { "clear": "נקה" } }
        }))
        .unwrap();

        assert_eq!(table.get("title"), Some("סקייטפארקים"));
        assert_eq!(table.get("common.video"), Some("וידאו"));
        assert_eq!(table.get("common.filters.clear"), Some("נקה"));
        assert_eq!(table.get("common"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_scalars_and_skipped_values() {
        let table = TranslationTable::from_json(&json!({
            "count": 12,
            "open": true,
            "tags": ["a", "b"],
            "empty": null
        }))
        .unwrap();

        assert_eq!(table.get("count"), Some("12"));
        assert_eq!(table.get("open"), Some("true"));
        assert!(!table.contains_key("tags"));
        assert!(!table.contains_key("empty"));
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(TranslationTable::from_json(&json!(["x"])).is_none());
        assert!(TranslationTable::from_json_str("\"text\"").is_err());
        assert!(TranslationTable::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_iterator() {
        let table: TranslationTable = [("clear", "Clear"), ("search", "Search")]
            .into_iter()
            .collect();
        assert_eq!(table.get("search"), Some("Search"));
        assert_eq!(table.keys().into_iter().collect::<Vec<_>>(), vec!["clear", "search"]);
    }

    #[test]
    fn test_placeholders() {
        let names = placeholders("Found {count} parks in {city}");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["city", "count"]);
        assert!(placeholders("no markers").is_empty());
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(
            interpolate("Found {count} parks in {city}", &[("count", "7"), ("city", "חיפה")]),
            "Found 7 parks in חיפה"
        );
    }

    #[test]
    fn test_interpolate_leaves_unknown_placeholders() {
        assert_eq!(interpolate("Hi {name}", &[("other", "x")]), "Hi {name}");
        assert_eq!(interpolate("Hi {name}", &[]), "Hi {name}");
    }
}
