//! Saving scripts to disk (the "download" action)
//!
//! Also exports the current listing as JSON for scripting.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::models::Entry;

/// Write a script's text to `dir/<filename>` and return the written path
///
/// Only the final component of the entry's filename is used, so a filename
/// such as `../../x.lua` still lands inside `dir`. Existing files are
/// overwritten.
///
/// # Examples
///
/// ```no_run
/// use scriptdeck_core::export::save_script;
/// # fn demo(entry: &scriptdeck_core::models::Entry) -> Result<(), scriptdeck_core::CoreError> {
/// let path = save_script(std::path::Path::new("."), entry, "-- lua")?;
/// println!("saved {}", path.display());
/// # Ok(())
/// # }
/// ```
pub fn save_script(dir: &Path, entry: &Entry, text: &str) -> Result<PathBuf, CoreError> {
    std::fs::create_dir_all(dir).map_err(|source| CoreError::FileWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(download_name(entry));

    std::fs::write(&path, text).map_err(|source| CoreError::FileWrite {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = text.len(), "Script saved");

    Ok(path)
}

/// Filename to save an entry under
///
/// Last path component of `entry.filename`; `<key>.lua` if nothing usable
/// is left.
pub fn download_name(entry: &Entry) -> String {
    let name = entry
        .filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        format!("{}.lua", entry.key.replace(['/', '\\'], "_"))
    } else {
        name.to_string()
    }
}

/// Export entries to a JSON array file
pub fn export_entries_to_json(entries: &[Entry], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries).context("Failed to serialize entries")?;
    writer.flush().context("Failed to flush JSON file")?;

    Ok(())
}
