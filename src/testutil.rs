//! Throwaway upstream repositories for tests.

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::{Path, PathBuf};

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

pub struct Upstream {
    pub dir: PathBuf,
    repo: Repository,
}

impl Upstream {
    pub fn new(dir: PathBuf) -> Self {
        fs::create_dir_all(&dir).unwrap();
        let repo = Repository::init(&dir).unwrap();
        Self { dir, repo }
    }

    /// Like [`Upstream::new`], with `branch` as the initial branch.
    pub fn on_branch(dir: PathBuf, branch: &str) -> Self {
        fs::create_dir_all(&dir).unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(branch);
        let repo = Repository::init_opts(&dir, &opts).unwrap();
        Self { dir, repo }
    }

    pub fn url(&self) -> String {
        file_url(&self.dir)
    }

    /// Write `rel` and commit it on the current branch.
    pub fn commit_file(&self, rel: &str, content: &str, msg: &str) -> Oid {
        let path = self.dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let sig = Signature::now("docsync", "docsync@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, msg, &tree, &parents)
            .unwrap()
    }
}
