//! # docsync
//!
//! Pull the documentation of an upstream template repository into this site.
//!
//! - `docsync` syncs the latest upstream commit
//! - `docsync <COMMIT>` pins the upstream to that commit first
//! - `docsync --print-last` prints the commit recorded by the last sync
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::Colorize;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

use docsync::{SyncRequest, base_dir, cmd_print_last, cmd_sync, resolve_settings};

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "docsync",
    version,
    about = "docsync - mirror upstream documentation into this site"
)]
struct Cli {
    /// Upstream commit to sync (defaults to the latest commit)
    commit: Option<String>,

    /// Project directory holding the clone, destination and cache file
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Settings file (defaults to <BASE_DIR>/docsync.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Upstream repository URL
    #[arg(long)]
    url: Option<String>,

    /// Destination directory for the copied documentation
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Shallow clone/fetch depth (0 = full history)
    #[arg(long, value_name = "N")]
    depth: Option<u32>,

    /// Reuse an existing clone even if its origin URL differs
    #[arg(long)]
    no_verify_remote: bool,

    /// Print the commit recorded by the last sync and exit
    #[arg(long, conflicts_with = "commit")]
    print_last: bool,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors and the final result
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logger(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Warn
    } else {
        match cli.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let base = base_dir(cli.base_dir.as_deref())?;
    let mut settings = resolve_settings(&base, cli.config.as_deref())?;

    if cli.print_last {
        return cmd_print_last(&base, &settings);
    }

    if let Some(url) = cli.url {
        settings.url = url;
    }
    if let Some(dest) = cli.dest {
        settings.destination = dest;
    }
    if let Some(depth) = cli.depth {
        settings.depth = depth;
    }
    if cli.no_verify_remote {
        settings.verify_remote = false;
    }

    cmd_sync(&SyncRequest {
        base_dir: base,
        settings,
        commit: cli.commit,
        progress: !cli.quiet,
    })
}

/// CLI entry point.
///
/// Any error is printed with its full context chain and exits with status 1.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
