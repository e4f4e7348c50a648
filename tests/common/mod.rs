//! Shared helpers for the CLI end-to-end tests.

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::Path;

/// Initialise a repository at `dir` and commit each `(path, content)` pair.
/// Returns the `file://` URL of the repository and the last commit.
pub fn upstream_with(dir: &Path, files: &[(&str, &str)]) -> (String, Oid) {
    fs::create_dir_all(dir).unwrap();
    let repo = Repository::init(dir).unwrap();
    let sig = Signature::now("docsync", "docsync@example.com").unwrap();

    let mut last = None;
    for (rel, content) in files {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let parent = last.map(|id| repo.find_commit(id).unwrap());
        let parents: Vec<_> = parent.iter().collect();
        last = Some(
            repo.commit(Some("HEAD"), &sig, &sig, &format!("add {}", rel), &tree, &parents)
                .unwrap(),
        );
    }

    (format!("file://{}", dir.display()), last.expect("at least one file"))
}
