//! Catalog entry models

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one catalog entry: `(category, key)`
///
/// The textual form is `category/key`, the same shape the script site uses
/// in its `?script=` deep links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId {
    pub category: String,
    pub key: String,
}

impl EntryId {
    pub fn new(category: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
        }
    }

    /// Parse `category/key`, splitting on the first `/`
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidEntryId {
            input: input.to_string(),
        };

        let (category, key) = input.trim().split_once('/').ok_or_else(invalid)?;
        if category.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(category, key))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.key)
    }
}

impl std::str::FromStr for EntryId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One catalog item with display metadata and a source filename
///
/// Defaults are already applied: `title` falls back to the key and
/// `filename` to `<key>.lua`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub category: String,
    pub key: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub filename: String,
}

impl Entry {
    pub fn id(&self) -> EntryId {
        EntryId::new(self.category.clone(), self.key.clone())
    }

    /// Whether this entry has the given identity (no allocation)
    pub fn is(&self, id: &EntryId) -> bool {
        self.category == id.category && self.key == id.key
    }

    /// Card summary: short description, else the long one
    pub fn summary(&self) -> &str {
        if self.short_description.is_empty() {
            &self.description
        } else {
            &self.short_description
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_parse() {
        let id = EntryId::parse("Core/foo").unwrap();
        assert_eq!(id.category, "Core");
        assert_eq!(id.key, "foo");
        assert_eq!(id.to_string(), "Core/foo");
    }

    #[test]
    fn test_entry_id_parse_splits_on_first_slash() {
        let id: EntryId = "Mini Games/zombies/v2".parse().unwrap();
        assert_eq!(id.category, "Mini Games");
        assert_eq!(id.key, "zombies/v2");
    }

    #[test]
    fn test_entry_id_parse_rejects_bad_input() {
        assert!(matches!(
            EntryId::parse("nokey"),
            Err(CoreError::InvalidEntryId { .. })
        ));
        assert!(EntryId::parse("/foo").is_err());
        assert!(EntryId::parse("Core/").is_err());
    }

    #[test]
    fn test_summary_falls_back_to_description() {
        let mut entry = Entry {
            category: "Core".into(),
            key: "foo".into(),
            title: "Foo".into(),
            description: "Long text".into(),
            short_description: String::new(),
            filename: "foo.lua".into(),
        };
        assert_eq!(entry.summary(), "Long text");

        entry.short_description = "Short".into();
        assert_eq!(entry.summary(), "Short");
        assert!(entry.is(&EntryId::new("Core", "foo")));
    }
}
