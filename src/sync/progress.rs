use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shown while the upstream clone is created or fetched and reset.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg}")
        .expect("static template")
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

/// Fetch finished; the message names the resolved commit.
pub fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}").expect("static template")
}

/// Fetch failed; the message carries the git error.
pub fn err_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}").expect("static template")
}

/// Spinner for the fetch phase. Hidden under `--quiet` and in tests.
pub fn spinner(visible: bool, msg: String) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
