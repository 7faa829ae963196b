//! scriptdeck-core - Core library for scriptdeck
//!
//! Provides the metadata index, the script content cache, and the transport
//! seam for browsing the SAPP script catalog.

pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod export;
pub mod index;
pub mod models;
pub mod store;
pub mod transport;

pub use config::SourceConfig;
pub use content::{ContentCache, ContentHit, PathState};
pub use error::{CatalogStatus, CoreError, LoadReport};
pub use event::{DataEvent, EventBus};
pub use index::{filter, flatten, CategoryFilter, CategorySummary, MetadataIndex};
pub use models::{Entry, EntryId};
pub use store::Catalog;
pub use transport::{FetchResponse, HttpTransport, MemoryTransport, Transport};
