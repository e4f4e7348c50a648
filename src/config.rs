use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::source::DEFAULT_CLONE_PREFIX;

/// Default upstream repository holding the documentation.
pub const DEFAULT_URL: &str = "https://github.com/Lay3rLabs/wavs-foundry-template.git";

/// File name looked up in the base directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "docsync.toml";

/// Sync settings, optionally loaded from `docsync.toml`.
///
/// Every key is optional; missing keys keep their defaults. Relative paths are
/// resolved against the base directory.
///
/// Example TOML:
/// ```toml
/// url           = "https://github.com/Lay3rLabs/wavs-foundry-template.git"
/// source_subdir = "docs"
/// destination   = "content/docs"
/// cache_file    = "last_commit_sync.txt"
/// depth         = 1
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub url: String,
    /// Directory inside the clone that gets mirrored.
    pub source_subdir: PathBuf,
    pub destination: PathBuf,
    pub cache_file: PathBuf,
    pub clone_prefix: String,
    /// Shallow depth for clone/fetch; `0` fetches full history.
    pub depth: u32,
    /// Refuse to reuse an existing clone whose `origin` is a different URL.
    pub verify_remote: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            source_subdir: PathBuf::from("docs"),
            destination: PathBuf::from("content").join("docs"),
            cache_file: PathBuf::from("last_commit_sync.txt"),
            clone_prefix: DEFAULT_CLONE_PREFIX.to_string(),
            depth: 1,
            verify_remote: true,
        }
    }
}

/// Load and parse a settings file.
///
/// # Errors
/// - Returns an error if the file cannot be read.
/// - Returns an error if parsing the TOML fails (unknown keys included).
pub fn load_settings(path: &Path) -> Result<Settings> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("config not found: {}", path.display()))?;
    let settings: Settings = toml::from_str(&txt)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(settings)
}

/// Resolve the settings for a run.
///
/// An explicit path must exist. Without one, `<base_dir>/docsync.toml` is used
/// when present and defaults apply otherwise.
pub fn resolve_settings(base_dir: &Path, explicit: Option<&Path>) -> Result<Settings> {
    if let Some(p) = explicit {
        return load_settings(p);
    }
    let p = base_dir.join(CONFIG_FILE_NAME);
    if p.is_file() {
        load_settings(&p)
    } else {
        Ok(Settings::default())
    }
}
