use anyhow::{Context, Result, bail};
use log::debug;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run `git [-C dir] <args>` and return its trimmed stdout.
///
/// Prompts are disabled so a missing credential fails instead of hanging
/// behind the progress spinner.
///
/// # Errors
/// Returns an error if `git` cannot be spawned or exits with a non-zero
/// status. The message carries the command line, the status and stderr.
pub fn git<S: AsRef<OsStr>>(dir: Option<&Path>, args: &[S]) -> Result<String> {
    let rendered = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");

    let mut cmd = Command::new("git");
    if let Some(d) = dir {
        cmd.arg("-C").arg(d);
    }
    cmd.args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null());

    debug!("running: git {}", rendered);
    let output = cmd
        .output()
        .with_context(|| format!("failed to run `git {}` (is git installed?)", rendered))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("`git {}` failed ({}): {}", rendered, output.status, stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// `--depth=<n>` for a shallow operation, nothing for a full one.
pub fn depth_arg(depth: u32) -> Option<String> {
    (depth > 0).then(|| format!("--depth={}", depth))
}
