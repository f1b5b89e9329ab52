//! Repository path splitting and name utilities

/// Separator used by repository listings, independent of the host platform
pub const SEPARATOR: char = '/';

/// Split a repository path into its non-empty segments
///
/// Leading, trailing and repeated separators produce empty segments, which are
/// dropped. A path made only of separators yields no segments at all.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Join segments back into a repository path
pub fn join_segments(segments: &[&str]) -> String {
    segments.join("/")
}

/// Extension of a file name: everything after the last `.`
///
/// Returns `None` when the name contains no `.`. Dotfiles count as having an
/// extension (`.gitignore` -> `gitignore`), and a trailing dot yields an empty one.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx + 1..])
}
