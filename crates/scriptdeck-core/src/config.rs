//! Remote source configuration
//!
//! Defaults point at the public HALO-SCRIPT-PROJECTS repository. An optional
//! `config.toml` under the user config dir can retarget a fork or branch;
//! the binary layers CLI flags on top.

use crate::error::CoreError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_OWNER: &str = "Chalwk";
pub const DEFAULT_REPO: &str = "HALO-SCRIPT-PROJECTS";
pub const DEFAULT_BRANCH: &str = "master";

/// Directory under the repository root that holds script files
pub const CONTENT_ROOT: &str = "sapp";

const RAW_HOST: &str = "https://raw.githubusercontent.com";

/// Where the metadata document and script files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Full URL of `metadata.json`
    pub metadata_url: String,
    /// Base URL that resolved content paths are appended to (ends with `/`)
    pub raw_base: String,
    /// First segment of every content path
    pub content_root: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::github(DEFAULT_OWNER, DEFAULT_REPO, DEFAULT_BRANCH)
    }
}

impl SourceConfig {
    /// Raw-content URLs for a GitHub repository branch
    pub fn github(owner: &str, repo: &str, branch: &str) -> Self {
        let raw_base = format!("{}/{}/{}/{}/", RAW_HOST, owner, repo, branch);
        Self {
            metadata_url: format!("{}metadata.json", raw_base),
            raw_base,
            content_root: CONTENT_ROOT.to_string(),
        }
    }

    /// Explicit URLs (e.g. a mirror or a local test server)
    pub fn custom(metadata_url: impl Into<String>, raw_base: impl Into<String>) -> Self {
        Self {
            metadata_url: metadata_url.into(),
            raw_base: normalize_base(raw_base.into()),
            content_root: CONTENT_ROOT.to_string(),
        }
    }

    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    pub fn with_raw_base(mut self, base: impl Into<String>) -> Self {
        self.raw_base = normalize_base(base.into());
        self
    }

    /// Full URL for a resolved content path
    pub fn content_url(&self, path: &str) -> String {
        format!("{}{}", self.raw_base, path.trim_start_matches('/'))
    }

    /// Apply a config file on top of these values
    ///
    /// `owner`/`repo`/`branch` rebuild both URLs; explicit `metadata_url` and
    /// `raw_base` win over them.
    pub fn merge_file(mut self, file: &ConfigFile) -> Self {
        if file.owner.is_some() || file.repo.is_some() || file.branch.is_some() {
            let rebuilt = Self::github(
                file.owner.as_deref().unwrap_or(DEFAULT_OWNER),
                file.repo.as_deref().unwrap_or(DEFAULT_REPO),
                file.branch.as_deref().unwrap_or(DEFAULT_BRANCH),
            );
            self.metadata_url = rebuilt.metadata_url;
            self.raw_base = rebuilt.raw_base;
        }
        if let Some(url) = &file.metadata_url {
            self.metadata_url = url.clone();
        }
        if let Some(base) = &file.raw_base {
            self.raw_base = normalize_base(base.clone());
        }
        self
    }

    /// Defaults + config file (if any)
    ///
    /// `path` overrides the default location. A missing file is fine; a
    /// broken one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        match ConfigFile::read(&path)? {
            Some(file) => {
                tracing::debug!(path = %path.display(), "Loaded config file");
                Ok(Self::default().merge_file(&file))
            }
            None => Ok(Self::default()),
        }
    }
}

/// On-disk `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub metadata_url: Option<String>,
    pub raw_base: Option<String>,
}

impl ConfigFile {
    /// Read and parse; `Ok(None)` when the file does not exist
    pub fn read(path: &Path) -> Result<Option<Self>, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::InvalidConfig {
                    message: format!("Cannot read {}: {}", path.display(), e),
                })
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| CoreError::InvalidConfig {
                message: format!("Cannot parse {}: {}", path.display(), e),
            })
    }
}

/// `<config_dir>/scriptdeck/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("scriptdeck").join("config.toml"))
}

fn normalize_base(mut base: String) -> String {
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_urls() {
        let config = SourceConfig::default();
        assert_eq!(
            config.metadata_url,
            "https://raw.githubusercontent.com/Chalwk/HALO-SCRIPT-PROJECTS/master/metadata.json"
        );
        assert_eq!(
            config.content_url("sapp/Core/foo.lua"),
            "https://raw.githubusercontent.com/Chalwk/HALO-SCRIPT-PROJECTS/master/sapp/Core/foo.lua"
        );
    }

    #[test]
    fn test_raw_base_gets_trailing_slash() {
        let config = SourceConfig::custom("http://localhost/m.json", "http://localhost/raw");
        assert_eq!(config.raw_base, "http://localhost/raw/");
        assert_eq!(
            config.content_url("/sapp/a/b.lua"),
            "http://localhost/raw/sapp/a/b.lua"
        );
    }

    #[test]
    fn test_merge_file_branch_then_explicit_urls() {
        let file = ConfigFile {
            branch: Some("dev".into()),
            ..Default::default()
        };
        let config = SourceConfig::default().merge_file(&file);
        assert!(config.metadata_url.contains("/Chalwk/HALO-SCRIPT-PROJECTS/dev/"));

        let file = ConfigFile {
            owner: Some("someone".into()),
            metadata_url: Some("http://mirror/metadata.json".into()),
            ..Default::default()
        };
        let config = SourceConfig::default().merge_file(&file);
        assert_eq!(config.metadata_url, "http://mirror/metadata.json");
        assert!(config.raw_base.contains("/someone/"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = SourceConfig::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, SourceConfig::default());
    }

    #[test]
    fn test_load_file_and_reject_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "raw_base = \"http://mirror/raw\"\n").unwrap();
        let config = SourceConfig::load(Some(&path)).unwrap();
        assert_eq!(config.raw_base, "http://mirror/raw/");

        std::fs::write(&path, "unknown_key = 1\n").unwrap();
        assert!(matches!(
            SourceConfig::load(Some(&path)),
            Err(CoreError::InvalidConfig { .. })
        ));
    }
}
