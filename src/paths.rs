use anyhow::{Context, Result};
use std::{env, path::Path, path::PathBuf};

use crate::config::Settings;
use crate::source::RemoteSource;

/// Filesystem locations used by one sync run.
#[derive(Clone, Debug)]
pub struct Paths {
    pub clone: PathBuf,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub cache_file: PathBuf,
}

/// Base directory of the documentation project: the given one, or the
/// current working directory.
pub fn base_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => env::current_dir().context("cannot determine current directory"),
    }
}

/// Lay out every path of a run below `base`.
pub fn paths(base: &Path, settings: &Settings, source: &RemoteSource) -> Result<Paths> {
    let clone = base.join(source.clone_dir_name(&settings.clone_prefix)?);
    Ok(Paths {
        source: clone.join(&settings.source_subdir),
        clone,
        destination: base.join(&settings.destination),
        cache_file: base.join(&settings.cache_file),
    })
}
