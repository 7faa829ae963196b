//! Error types for scriptdeck-core
//!
//! Two kinds of failure reach the user: the metadata index could not be
//! loaded, or a single script could not be fetched. Everything else is
//! plumbing that gets folded into one of those at the service boundary.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for scriptdeck operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Remote Errors
    // ===================
    #[error("Metadata unavailable from {url}: {reason}")]
    MetadataUnavailable { url: String, reason: String },

    #[error("Content unavailable for {path}: {reason}")]
    ContentUnavailable { path: String, reason: String },

    /// Raised by transports; the index and content cache fold it into the
    /// two `*Unavailable` variants before it reaches a caller
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // ===================
    // Lookup Errors
    // ===================
    #[error("Script not found: {id}")]
    EntryNotFound { id: String },

    #[error("Invalid script id '{input}' (expected <category>/<key>)")]
    InvalidEntryId { input: String },

    // ===================
    // Local Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Short text for a status line or toast
    pub fn user_message(&self) -> String {
        match self {
            CoreError::MetadataUnavailable { .. } | CoreError::Transport { .. } => {
                "Failed to load".to_string()
            }
            CoreError::ContentUnavailable { .. } => "Error loading script".to_string(),
            CoreError::EntryNotFound { id } => format!("Script not found: {}", id),
            CoreError::InvalidEntryId { input } => format!("Invalid script id: {}", input),
            CoreError::InvalidConfig { .. } => "Invalid configuration".to_string(),
            CoreError::FileWrite { path, .. } => format!("Cannot write {}", path.display()),
        }
    }
}

/// Summary of one metadata reload
///
/// A failed reload still produces a report so callers can surface the
/// reason without losing track of what stayed loaded.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Entries in the index after the reload
    pub entries: usize,
    /// Distinct categories in the index after the reload
    pub categories: usize,
    /// Wall time spent on the fetch + parse
    pub elapsed: Duration,
    /// Why the reload failed, if it did
    pub error: Option<String>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Catalog health as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    /// No load attempted yet
    NotLoaded,
    /// Last load succeeded
    Ready {
        entries: usize,
        loaded_at: chrono::DateTime<chrono::Utc>,
    },
    /// Last load failed but an older index is still being served
    Stale { entries: usize, reason: String },
    /// Last load failed and there is nothing to serve
    Unavailable { reason: String },
}

impl CatalogStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CatalogStatus::Ready { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_short() {
        let err = CoreError::MetadataUnavailable {
            url: "https://example.invalid/metadata.json".to_string(),
            reason: "HTTP 404".to_string(),
        };
        assert_eq!(err.user_message(), "Failed to load");

        let err = CoreError::ContentUnavailable {
            path: "sapp/Core/foo.lua".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(err.user_message(), "Error loading script");
    }

    #[test]
    fn test_display_includes_context() {
        let err = CoreError::ContentUnavailable {
            path: "sapp/Core/foo.lua".to_string(),
            reason: "HTTP 404".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("sapp/Core/foo.lua"));
        assert!(text.contains("404"));

        let err = CoreError::EntryNotFound {
            id: "Core/missing".to_string(),
        };
        assert_eq!(err.user_message(), "Script not found: Core/missing");
    }

    #[test]
    fn test_catalog_status_flags() {
        assert!(!CatalogStatus::NotLoaded.is_ready());
        assert!(!CatalogStatus::Stale {
            entries: 3,
            reason: "HTTP 404".to_string()
        }
        .is_ready());
        assert!(CatalogStatus::Ready {
            entries: 3,
            loaded_at: chrono::Utc::now()
        }
        .is_ready());
    }
}
