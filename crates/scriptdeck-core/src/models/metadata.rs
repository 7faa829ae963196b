//! Raw metadata document parser
//!
//! Shape: `{ category: { key: { title, description, shortDescription, filename } } }`.
//! Document order is kept (serde_json `preserve_order`), so flattening
//! mirrors the order the source exposes.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Attribute record for one script, as published
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub short_description: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,
}

/// Parsed metadata document: categories with their keyed records, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub categories: Vec<(String, Vec<(String, RawEntry)>)>,
}

impl RawMetadata {
    /// Parse the metadata JSON document
    ///
    /// Any structural problem rejects the whole document.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let root: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| format!("invalid JSON: {}", e))?;

        let mut categories = Vec::with_capacity(root.len());

        for (category, value) in root {
            let Value::Object(records) = value else {
                return Err(format!("category '{}' is not an object", category));
            };

            let mut entries = Vec::with_capacity(records.len());
            for (key, record) in records {
                let raw: RawEntry = serde_json::from_value(record)
                    .map_err(|e| format!("entry '{}/{}': {}", category, key, e))?;
                entries.push((key, raw));
            }

            categories.push((category, entries));
        }

        Ok(Self { categories })
    }

    /// Total number of `(category, key)` records
    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|(_, entries)| entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_document_order() {
        let json = r#"{
            "Zeta": {"b": {"title": "B"}, "a": {"title": "A"}},
            "Alpha": {"x": {}}
        }"#;

        let raw = RawMetadata::from_json(json).unwrap();
        let names: Vec<_> = raw.categories.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);

        let keys: Vec<_> = raw.categories[0].1.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(raw.entry_count(), 3);
    }

    #[test]
    fn test_parse_camel_case_and_unknown_fields() {
        let json = r#"{"Core": {"foo": {
            "title": "Foo",
            "shortDescription": "short",
            "filename": "foo.lua",
            "author": "someone"
        }}}"#;

        let raw = RawMetadata::from_json(json).unwrap();
        let (_, entries) = &raw.categories[0];
        let (key, entry) = &entries[0];
        assert_eq!(key, "foo");
        assert_eq!(entry.short_description.as_deref(), Some("short"));
        assert_eq!(entry.description, None);
    }

    #[test]
    fn test_parse_rejects_malformed_documents() {
        assert!(RawMetadata::from_json("not json").is_err());
        assert!(RawMetadata::from_json("[1, 2]").is_err());
        assert!(RawMetadata::from_json(r#"{"Core": "oops"}"#).is_err());
        assert!(RawMetadata::from_json(r#"{"Core": {"foo": {"title": 7}}}"#).is_err());
    }

    #[test]
    fn test_null_attributes_are_missing() {
        let raw = RawMetadata::from_json(r#"{"Core": {"foo": {"title": null}}}"#).unwrap();
        assert_eq!(raw.categories[0].1[0].1.title, None);
    }
}
