//! Data models for scriptdeck

pub mod entry;
pub mod metadata;

pub use entry::{Entry, EntryId};
pub use metadata::{RawEntry, RawMetadata};
