mod progress;

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::cache::{read_last_commit, write_last_commit};
use crate::config::Settings;
use crate::copy::{CopyReport, copy_tree};
use crate::git::{CloneOptions, ensure_repo};
use crate::paths::{Paths, paths};
use crate::source::RemoteSource;

use progress::{err_style, ok_style, spinner};

/// Inputs of one sync run.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub base_dir: PathBuf,
    pub settings: Settings,
    /// Commit to pin to; `None` tracks the latest commit.
    pub commit: Option<String>,
    /// Show a spinner while fetching.
    pub progress: bool,
}

/// What a sync run produced.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub repo_name: String,
    pub commit: String,
    pub previous: Option<String>,
    pub paths: Paths,
    pub report: CopyReport,
}

/// Fetch the upstream documentation and mirror it into the project.
///
/// `Downloaded <name> at commit <hash>` goes to stdout as soon as the
/// upstream is pinned, so the commit is visible even if the copy fails.
///
/// High-level flow:
/// 1. Derive every location from the base directory and settings.
/// 2. Clone or refresh the upstream and pin it (see [`ensure_repo`]).
/// 3. Mirror `<clone>/<source_subdir>` into the destination, stripping
///    exclusion markers (see [`copy_tree`]).
/// 4. Record the resolved commit in the cache file.
///
/// # Errors
/// The first failure aborts the run. Nothing already written is rolled back,
/// and the cache file is only updated after the copy succeeded.
pub fn sync_docs(req: &SyncRequest) -> Result<SyncOutcome> {
    let source = RemoteSource::new(req.settings.url.clone(), req.commit.as_deref());
    let repo_name = source.repo_name()?.to_string();
    let p = paths(&req.base_dir, &req.settings, &source)?;

    let previous = read_last_commit(&p.cache_file)?;
    match (&previous, &source.commit) {
        (Some(prev), Some(want)) => info!("last synced commit {}, requested {}", prev, want),
        (Some(prev), None) => info!("last synced commit {}, requested latest", prev),
        (None, _) => {}
    }

    let opts = CloneOptions {
        depth: req.settings.depth,
        verify_remote: req.settings.verify_remote,
    };

    let pb = spinner(req.progress, format!("downloading {}", source.url));
    let commit = match ensure_repo(&source.url, &p.clone, source.commit.as_deref(), &opts) {
        Ok(c) => {
            pb.set_style(ok_style());
            pb.finish_with_message(format!("downloaded {} at commit {}", repo_name, c));
            println!("Downloaded {} at commit {}", repo_name, c);
            c
        }
        Err(e) => {
            pb.set_style(err_style());
            pb.finish_with_message(format!("downloading {} (error: {})", repo_name, e));
            return Err(e);
        }
    };

    let report = copy_tree(&p.source, &p.destination).with_context(|| {
        format!(
            "failed to copy {} into {}",
            p.source.display(),
            p.destination.display()
        )
    })?;
    info!(
        "copied {} files and {} directories ({} files filtered) into {}",
        report.files,
        report.dirs,
        report.filtered,
        p.destination.display()
    );

    write_last_commit(&p.cache_file, &commit)?;

    Ok(SyncOutcome {
        repo_name,
        commit,
        previous,
        paths: p,
        report,
    })
}

/// CLI command: run a sync.
pub fn cmd_sync(req: &SyncRequest) -> Result<()> {
    sync_docs(req)?;
    Ok(())
}

/// CLI command: print the commit recorded by the last sync, if any.
pub fn cmd_print_last(base_dir: &Path, settings: &Settings) -> Result<()> {
    if let Some(c) = read_last_commit(&base_dir.join(&settings.cache_file))? {
        println!("{}", c);
    }
    Ok(())
}
