use anyhow::{Result, anyhow};

/// Prefix that namespaces local clones from unrelated directories.
pub const DEFAULT_CLONE_PREFIX: &str = "dsource-";

/// An upstream repository and the commit it should be pinned to.
///
/// `commit: None` means "track the latest commit of the current branch".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    pub url: String,
    pub commit: Option<String>,
}

impl RemoteSource {
    /// Build a source, treating a blank commit identifier as absent.
    pub fn new(url: impl Into<String>, commit: Option<&str>) -> Self {
        let commit = commit
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self {
            url: url.into(),
            commit,
        }
    }

    /// Repository name derived from the URL (see [`repo_name_from_url`]).
    pub fn repo_name(&self) -> Result<&str> {
        repo_name_from_url(&self.url)
            .ok_or_else(|| anyhow!("cannot derive a repository name from url: {}", self.url))
    }

    /// Directory name of the local clone, e.g. `dsource-foo`.
    pub fn clone_dir_name(&self, prefix: &str) -> Result<String> {
        Ok(format!("{}{}", prefix, self.repo_name()?))
    }
}

/// Extract the repository name from a git URL.
///
/// Takes the last path segment after dropping any query string, fragment and
/// trailing slashes, then strips a `.git` suffix. scp-like URLs
/// (`git@host:repo.git`) are handled too.
///
/// Returns `None` if nothing usable remains.
pub fn repo_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    let last = path.rsplit(|c| c == '/' || c == ':').next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() { None } else { Some(name) }
}
