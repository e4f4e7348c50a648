/// Substrings that mark a line as upstream-only.
///
/// Two markers (begin / end of an excluded block), each with two accepted
/// spellings. Every substring is matched on its own: a line carrying any of
/// them is dropped, and lines sitting between a begin and an end marker are
/// kept.
pub const EXCLUSION_MARKERS: [&str; 4] = [
    "<!--docsignore",
    "<!--ignoredocs",
    "docsignore-->",
    "ignoredocs-->",
];

/// Returns `true` if `line` contains at least one exclusion marker.
pub fn is_excluded(line: &str) -> bool {
    EXCLUSION_MARKERS.iter().any(|m| line.contains(m))
}

/// Remove every marker-bearing line from `content`.
///
/// Lines are split on `\n` and rejoined with `\n`, so a trailing newline
/// survives. Callers reading files pass content through
/// [`normalize_newlines`] first, which makes every mirrored file LF-only.
///
/// ```
/// use docsync::strip_excluded_lines;
///
/// let input = "keep1\n<!--docsignore\nkeep2\ndocsignore-->\nkeep3";
/// assert_eq!(strip_excluded_lines(input), "keep1\nkeep2\nkeep3");
/// ```
pub fn strip_excluded_lines(content: &str) -> String {
    content
        .split('\n')
        .filter(|line| !is_excluded(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn `\r\n` and lone `\r` line endings into `\n`.
pub fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
