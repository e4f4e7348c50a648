//! Git integration layer.
//!
//! Network operations (shallow clone, fetch of a single commit) go through the
//! `git` executable so that user credentials and transport settings apply as
//! usual. Inspecting and resetting the local clone is done with `git2`.
//!
//! Other modules should only use [`ensure_repo`] and [`CloneOptions`].

mod command;
mod git2_backend;

pub use git2_backend::{CloneOptions, ensure_repo};
