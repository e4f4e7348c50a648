//! Crate entry point for **docsync**.
//!
//! docsync mirrors the documentation tree of an upstream template repository
//! into a local documentation site. The upstream stays the source of truth;
//! this crate clones it, pins it to a commit, copies its `docs/` directory
//! into `content/docs` and drops lines carrying exclusion markers.
//!
//! Each submodule encapsulates one responsibility (settings, git operations,
//! copying, line filtering, sync orchestration).

mod cache;
mod config;
mod copy;
mod filter;
mod git;
mod paths;
mod source;
mod sync;

#[cfg(test)]
mod testutil;

pub use cache::{read_last_commit, write_last_commit};
pub use config::{CONFIG_FILE_NAME, DEFAULT_URL, Settings, load_settings, resolve_settings};
pub use copy::{CopyOperation, CopyReport, copy_tree};
pub use filter::{EXCLUSION_MARKERS, is_excluded, normalize_newlines, strip_excluded_lines};
pub use git::{CloneOptions, ensure_repo};
pub use paths::{Paths, base_dir, paths};
pub use source::{DEFAULT_CLONE_PREFIX, RemoteSource, repo_name_from_url};
pub use sync::{SyncOutcome, SyncRequest, cmd_print_last, cmd_sync, sync_docs};
