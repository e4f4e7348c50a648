use anyhow::{Context, Result, anyhow, bail};
use git2::{Commit, Repository, ResetType, build::CheckoutBuilder};
use log::info;
use std::fs;
use std::path::Path;

use super::command::{depth_arg, git};

/// How the local clone is created and refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneOptions {
    /// Shallow depth for clone and fetch; `0` means full history.
    pub depth: u32,
    /// Check that an existing clone's `origin` points at the requested URL.
    pub verify_remote: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            depth: 1,
            verify_remote: true,
        }
    }
}

/// Ensure that a clone of `url` exists at `dest`, pin it and return the full
/// hash of the checked-out commit.
///
/// - If `dest` does not exist it is cloned shallowly. If it exists it is
///   reused as-is (after the `origin` check when `verify_remote` is set).
/// - If `rev` is Some: fetch exactly that commit and hard-reset the current
///   branch to it.
/// - If `rev` is None: fetch `origin` and hard-reset the current branch to
///   `origin/<branch>`. A detached HEAD falls back to the remote's default
///   branch.
///
/// Local changes in the clone are discarded either way.
///
/// # Errors
/// Returns an error if any git command fails, the revision cannot be
/// resolved, or an existing directory is not a clone of `url`.
pub fn ensure_repo(url: &str, dest: &Path, rev: Option<&str>, opts: &CloneOptions) -> Result<String> {
    if dest.exists() {
        if opts.verify_remote {
            verify_origin(dest, url)?;
        }
    } else {
        clone_shallow(url, dest, opts.depth)?;
    }

    match rev {
        Some(r) => checkout_commit(dest, r, opts.depth)?,
        None => checkout_latest(dest, opts.depth)?,
    }

    let repo = open(dest)?;
    let head = repo.head()?.peel_to_commit()?;
    Ok(head.id().to_string())
}

fn open(dest: &Path) -> Result<Repository> {
    Repository::open(dest)
        .with_context(|| format!("{} is not a git repository", dest.display()))
}

/// `git clone [--depth=N] <url> <dest>`
fn clone_shallow(url: &str, dest: &Path, depth: u32) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    info!("cloning {} into {}", url, dest.display());

    let mut args: Vec<&std::ffi::OsStr> = vec!["clone".as_ref()];
    let depth = depth_arg(depth);
    if let Some(d) = &depth {
        args.push(d.as_ref());
    }
    args.push(url.as_ref());
    args.push(dest.as_os_str());
    git(None, &args).with_context(|| format!("git clone {}", url))?;
    Ok(())
}

/// Refuse to reuse a directory that is not a clone of `url`.
fn verify_origin(dest: &Path, url: &str) -> Result<()> {
    let repo = open(dest)?;
    let remote = repo
        .find_remote("origin")
        .with_context(|| format!("{} has no `origin` remote", dest.display()))?;
    let actual = remote.url().unwrap_or_default();
    if !same_url(actual, url) {
        bail!(
            "{} is a clone of {} but {} was requested; remove it or disable verify_remote",
            dest.display(),
            actual,
            url
        );
    }
    Ok(())
}

fn same_url(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Fetch a single commit from `origin` and hard-reset to it.
fn checkout_commit(dest: &Path, rev: &str, depth: u32) -> Result<()> {
    info!("checking out {} commit {}", dest.display(), rev);

    let mut args = vec!["fetch".to_string()];
    args.extend(depth_arg(depth));
    args.extend(["origin".to_string(), rev.to_string()]);
    git(Some(dest), &args)?;

    let repo = open(dest)?;
    let commit = resolve_fetched(&repo, rev)?;
    hard_reset(&repo, &commit)
}

/// Fetch `origin` and hard-reset the current branch to its remote tip.
fn checkout_latest(dest: &Path, depth: u32) -> Result<()> {
    info!("no commit specified for {}, pulling latest", dest.display());

    let mut args = vec!["fetch".to_string()];
    args.extend(depth_arg(depth));
    args.push("origin".to_string());
    git(Some(dest), &args)?;

    let repo = open(dest)?;
    let target = match current_branch(&repo)? {
        Some(branch) => format!("refs/remotes/origin/{}", branch),
        None => default_remote_ref(&repo)?,
    };
    let tip = repo
        .find_reference(&target)
        .with_context(|| format!("remote branch not found: {}", target))?
        .peel_to_commit()?;
    hard_reset(&repo, &tip)
}

/// Resolve the commit that a `fetch origin <rev>` brought in.
///
/// `rev` is tried first (full or abbreviated hash, local ref); when it does
/// not resolve locally, the first `FETCH_HEAD` entry is used.
fn resolve_fetched<'r>(repo: &'r Repository, rev: &str) -> Result<Commit<'r>> {
    if let Ok(obj) = repo.revparse_single(rev) {
        return obj
            .peel_to_commit()
            .map_err(|_| anyhow!("rev didn't peel to a commit: {}", rev));
    }

    let mut fetched = None;
    repo.fetchhead_foreach(|_name, _url, oid, _is_merge| {
        if fetched.is_none() {
            fetched = Some(*oid);
        }
        true
    })?;
    let oid = fetched.ok_or_else(|| anyhow!("rev not found: {}", rev))?;
    Ok(repo.find_commit(oid)?)
}

/// Name of the checked-out branch, `None` when HEAD is detached.
fn current_branch(repo: &Repository) -> Result<Option<String>> {
    if repo.head_detached()? {
        return Ok(None);
    }
    let head = repo.head()?;
    Ok(head.shorthand().map(str::to_string))
}

/// Remote ref of the default branch.
///
/// Fallbacks are tried in order if `origin/HEAD` is missing:
/// `refs/remotes/origin/main` → `refs/remotes/origin/master`.
fn default_remote_ref(repo: &Repository) -> Result<String> {
    if let Ok(origin_head) = repo.find_reference("refs/remotes/origin/HEAD") {
        return origin_head
            .symbolic_target()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("origin/HEAD has no symbolic target"));
    }
    for candidate in ["refs/remotes/origin/main", "refs/remotes/origin/master"] {
        if repo.find_reference(candidate).is_ok() {
            return Ok(candidate.to_string());
        }
    }
    Err(anyhow!(
        "could not determine default branch (missing origin/HEAD, origin/main, origin/master)"
    ))
}

/// `git reset --hard <commit>`: moves the current branch (or detached HEAD)
/// and forces the working tree to match.
fn hard_reset(repo: &Repository, commit: &Commit) -> Result<()> {
    let mut checkout = CheckoutBuilder::new();
    checkout.force().remove_untracked(false);
    repo.reset(commit.as_object(), ResetType::Hard, Some(&mut checkout))
        .with_context(|| format!("git reset --hard {}", commit.id()))?;
    Ok(())
}
