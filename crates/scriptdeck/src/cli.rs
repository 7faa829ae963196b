//! CLI commands for browsing the catalog without the TUI
//!
//! Provides list, categories, show and download helpers on top of `Catalog`.

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use scriptdeck_core::{CategorySummary, CoreError, Entry, EntryId};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    NoResults {
        query: String,
        scanned: usize,
    },
    NotFound {
        id: String,
        suggestions: Vec<String>,
    },
    AmbiguousKey {
        key: String,
        suggestions: Vec<String>,
    },
    Core(CoreError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NoResults { query, scanned } => {
                write!(
                    f,
                    "No scripts found for \"{}\" ({} scripts scanned)",
                    query, scanned
                )
            }
            CliError::NotFound { id, suggestions } => {
                write!(f, "Script not found: {}", id)?;
                if !suggestions.is_empty() {
                    write!(f, "\nDid you mean:")?;
                    for s in suggestions {
                        write!(f, "\n  - {}", s)?;
                    }
                }
                Ok(())
            }
            CliError::AmbiguousKey { key, suggestions } => {
                write!(
                    f,
                    "Ambiguous script key '{}': matches {} scripts",
                    key,
                    suggestions.len()
                )?;
                for s in suggestions {
                    write!(f, "\n  - {}", s)?;
                }
                Ok(())
            }
            CliError::Core(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        CliError::Core(e)
    }
}

// ============================================================================
// Query Helpers
// ============================================================================

const MAX_SUGGESTIONS: usize = 5;

/// Find an entry by `category/key`, or by bare key when it is unique
pub fn find_entry(entries: &[Entry], input: &str) -> Result<Entry, CliError> {
    let input = input.trim();

    if !input.contains('/') {
        let matches: Vec<&Entry> = entries.iter().filter(|e| e.key == input).collect();
        return match matches.as_slice() {
            [] => Err(CliError::NotFound {
                id: input.to_string(),
                suggestions: suggest(entries, None, input),
            }),
            [entry] => Ok((*entry).clone()),
            many => Err(CliError::AmbiguousKey {
                key: input.to_string(),
                suggestions: many.iter().map(|e| e.id().to_string()).collect(),
            }),
        };
    }

    let id = EntryId::parse(input)?;
    if let Some(entry) = entries.iter().find(|e| e.is(&id)) {
        return Ok(entry.clone());
    }

    Err(CliError::NotFound {
        id: id.to_string(),
        suggestions: suggest(entries, Some(&id.category), &id.key),
    })
}

/// Ids sharing the key, or matching it case-insensitively
fn suggest(entries: &[Entry], category: Option<&str>, key: &str) -> Vec<String> {
    let key_lower = key.to_lowercase();

    entries
        .iter()
        .filter(|e| {
            let same_key = e.key.to_lowercase() == key_lower;
            let same_category = category.is_some_and(|c| c.eq_ignore_ascii_case(&e.category));
            same_key || (same_category && e.key.to_lowercase().contains(&key_lower))
        })
        .take(MAX_SUGGESTIONS)
        .map(|e| e.id().to_string())
        .collect()
}

// ============================================================================
// Formatting
// ============================================================================

/// Format entries as table (human) or JSON
pub fn format_entry_table(entries: &[Entry], json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string());
    }

    if entries.is_empty() {
        return "No scripts found.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header(&["ID", "Title", "File", "Summary"], no_color));

    for entry in entries {
        let id = entry.id().to_string();
        let title = truncate(&entry.title, 32);
        let summary = truncate(entry.summary(), 48);

        table.add_row(Row::from(vec![
            id.as_str(),
            title.as_str(),
            entry.filename.as_str(),
            summary.as_str(),
        ]));
    }

    table.to_string()
}

/// Format category counts as table (human) or JSON
pub fn format_category_table(categories: &[CategorySummary], json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(categories).unwrap_or_else(|_| "[]".to_string());
    }

    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header(&["Category", "Scripts"], no_color));

    for category in categories {
        table.add_row(Row::from(vec![
            category.name.clone(),
            category.count.to_string(),
        ]));
    }

    table.to_string()
}

/// Header block printed above a script's code by `show`
pub fn format_entry_info(entry: &Entry) -> String {
    let mut lines = vec![];
    lines.push(format!("Script:       {}", entry.id()));
    lines.push(format!("Title:        {}", entry.title));
    lines.push(format!("File:         {}", entry.filename));
    if !entry.short_description.is_empty() {
        lines.push(format!("Summary:      {}", entry.short_description));
    }
    if !entry.description.is_empty() {
        lines.push(format!("Description:  {}", entry.description));
    }
    lines.join("\n")
}

fn header(names: &[&str], no_color: bool) -> Vec<Cell> {
    names
        .iter()
        .map(|name| {
            let cell = Cell::new(name);
            if no_color {
                cell
            } else {
                cell.fg(Color::Cyan)
            }
        })
        .collect()
}

// ============================================================================
// Utilities
// ============================================================================

pub fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        // Char-based so multi-byte text never splits mid-character
        s.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

// ============================================================================
// Tests
// ============================================================================
