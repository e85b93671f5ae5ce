//! Diff cleanup for prompt payloads

/// Header prefixes that carry no information about the change itself.
const METADATA_PREFIXES: &[&str] = &["diff --git", "index ", "new file mode ", "deleted file mode "];

/// Strip a unified diff down to the change itself.
///
/// VCS metadata headers are dropped, `---`/`+++` file markers become the
/// bare file name (or vanish when they point at `/dev/null`), and only hunk
/// headers plus added, removed and context lines are kept.
pub fn clean_diff(diff_output: &str) -> String {
    let mut cleaned: Vec<&str> = Vec::new();

    for line in diff_output.split('\n') {
        if METADATA_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        if line.starts_with("--- ") || line.starts_with("+++ ") {
            if line.contains("/dev/null") {
                continue;
            }
            cleaned.push(line.rsplit('/').next().unwrap_or(line));
            continue;
        }

        if line.starts_with("@@ ")
            || line.starts_with('+')
            || line.starts_with('-')
            || line.starts_with(' ')
        {
            cleaned.push(line);
        }
    }

    cleaned.join("\n")
}
