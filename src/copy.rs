use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::filter::{normalize_newlines, strip_excluded_lines};

/// One file or directory to mirror from the upstream tree.
#[derive(Debug, Clone)]
pub struct CopyOperation {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Counters collected while mirroring a tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    /// Top-level regular files copied.
    pub files: usize,
    /// Top-level directories copied.
    pub dirs: usize,
    /// Files rewritten through the line filter, nested ones included.
    pub filtered: usize,
}

/// Mirror `source_dir` into `destination_dir`, stripping exclusion markers
/// from every copied file.
///
/// - `destination_dir` is created if missing.
/// - Top-level regular files are copied, then filtered in place.
/// - Top-level directories are merged into the destination subtree, then
///   every file under the destination subtree is filtered in place.
/// - Anything else (sockets, broken symlinks, ...) is skipped.
///
/// # Errors
/// Aborts on the first I/O failure or on a file that is not valid UTF-8.
/// Files written before the failure are left in place.
pub fn copy_tree(source_dir: &Path, destination_dir: &Path) -> Result<CopyReport> {
    fs::create_dir_all(destination_dir)
        .with_context(|| format!("failed to create {}", destination_dir.display()))?;

    let mut entries = fs::read_dir(source_dir)
        .with_context(|| format!("failed to read {}", source_dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut report = CopyReport::default();
    for ent in entries {
        let op = CopyOperation {
            source: ent.path(),
            destination: destination_dir.join(ent.file_name()),
        };
        let name = ent.file_name().to_string_lossy().into_owned();

        // Follows symlinks.
        let meta = match fs::metadata(&op.source) {
            Ok(m) => m,
            Err(e) => {
                debug!("skipping {}: {}", op.source.display(), e);
                continue;
            }
        };

        if meta.is_file() {
            fs::copy(&op.source, &op.destination).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    op.source.display(),
                    op.destination.display()
                )
            })?;
            filter_in_place(&op.destination)?;
            report.files += 1;
            report.filtered += 1;
            info!("Copied: {}", name);
        } else if meta.is_dir() {
            copy_dir_merge(&op.source, &op.destination)?;
            report.filtered += filter_subtree(&op.destination)?;
            report.dirs += 1;
            info!("Copied directory: {}", name);
        } else {
            debug!("skipping {}: not a file or directory", op.source.display());
        }
    }

    Ok(report)
}

/// Recursively copy `src` into `dst`, merging with whatever already exists.
fn copy_dir_merge(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);

        let ft = entry.file_type();
        if ft.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create {}", target.display()))?;
        } else if ft.is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }
    Ok(())
}

/// Filter every file below `root`. Returns how many were rewritten.
fn filter_subtree(root: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() {
            filter_in_place(entry.path())?;
            count += 1;
        }
    }
    Ok(count)
}

fn filter_in_place(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {} as UTF-8 text", path.display()))?;
    debug!("Writing to {}", path.display());
    fs::write(path, strip_excluded_lines(&normalize_newlines(&content)))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn copies_files_and_strips_markers() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("out").join("docs");
        write(&src.join("index.md"), "# Intro\n<!--docsignore\nshown\ndocsignore-->\n");
        write(&src.join("plain.md"), "nothing to strip\n");

        let report = copy_tree(&src, &dst).unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.dirs, 0);
        assert_eq!(
            fs::read_to_string(dst.join("index.md")).unwrap(),
            "# Intro\nshown\n"
        );
        assert_eq!(
            fs::read_to_string(dst.join("plain.md")).unwrap(),
            "nothing to strip\n"
        );
        assert_eq!(
            fs::read_to_string(src.join("index.md")).unwrap(),
            "# Intro\n<!--docsignore\nshown\ndocsignore-->\n",
            "source must not be modified"
        );
    }

    #[test]
    fn nested_directories_are_mirrored_and_filtered() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        write(&src.join("guide/setup.md"), "a\n<!--ignoredocs\nb");
        write(&src.join("guide/deep/more.md"), "x\nignoredocs-->\ny");
        write(&src.join("guide/untouched.md"), "keep me");

        let report = copy_tree(&src, &dst).unwrap();

        assert_eq!(report.dirs, 1);
        assert_eq!(report.filtered, 3);
        assert_eq!(fs::read_to_string(dst.join("guide/setup.md")).unwrap(), "a\nb");
        assert_eq!(fs::read_to_string(dst.join("guide/deep/more.md")).unwrap(), "x\ny");
        assert_eq!(
            fs::read_to_string(dst.join("guide/untouched.md")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn merges_into_existing_destination() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        write(&src.join("guide/new.md"), "new");
        write(&dst.join("guide/local.md"), "local\n<!--docsignore");
        write(&dst.join("guide/new.md"), "stale");

        copy_tree(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("guide/new.md")).unwrap(), "new");
        // Existing files in a merged subtree go through the filter as well.
        assert_eq!(fs::read_to_string(dst.join("guide/local.md")).unwrap(), "local");
    }

    #[test]
    fn copying_twice_is_idempotent() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        write(&src.join("a.md"), "1\n<!--docsignore\n2");
        write(&src.join("sub/b.md"), "3\ndocsignore-->\n4");

        copy_tree(&src, &dst).unwrap();
        let first = (
            fs::read_to_string(dst.join("a.md")).unwrap(),
            fs::read_to_string(dst.join("sub/b.md")).unwrap(),
        );
        copy_tree(&src, &dst).unwrap();
        let second = (
            fs::read_to_string(dst.join("a.md")).unwrap(),
            fs::read_to_string(dst.join("sub/b.md")).unwrap(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn crlf_files_come_out_with_lf_endings() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        write(&src.join("a.md"), "one\r\n<!--docsignore\r\ntwo\r\n");
        write(&src.join("nested/b.md"), "x\r\ny\r");

        copy_tree(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.md")).unwrap(), "one\ntwo\n");
        assert_eq!(fs::read_to_string(dst.join("nested/b.md")).unwrap(), "x\ny\n");
    }

    #[test]
    fn non_utf8_file_aborts() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("logo.png"), [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]).unwrap();

        let err = copy_tree(&src, &td.path().join("dst")).unwrap_err();
        assert!(format!("{err:#}").contains("logo.png"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let td = tempdir().unwrap();
        let err = copy_tree(&td.path().join("nope"), &td.path().join("dst")).unwrap_err();
        assert!(format!("{err:#}").contains("nope"));
    }

    #[cfg(unix)]
    #[test]
    fn broken_top_level_symlink_is_skipped() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        std::os::unix::fs::symlink(src.join("missing.md"), src.join("dangling.md")).unwrap();
        write(&src.join("ok.md"), "ok");

        let report = copy_tree(&src, &td.path().join("dst")).unwrap();
        assert_eq!(report.files, 1);
        assert!(!td.path().join("dst/dangling.md").exists());
    }
}
