//! Structural validation for extracted candidates

/// Longest path accepted as a claim
const MAX_PATH_LEN: usize = 500;

/// Check whether a candidate path is safe and plausible enough to become a
/// claim.
///
/// Rejects empty/whitespace paths, traversal segments anywhere in the path,
/// absolute paths, `file://` URLs, embedded NUL bytes, and paths over the
/// length cap. `./`-prefixed relative paths and filenames with dots and
/// digits pass.
pub fn is_valid_path(path: &str) -> bool {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.len() > MAX_PATH_LEN {
        return false;
    }
    if trimmed.contains('\0') {
        return false;
    }
    if trimmed.starts_with("file://") {
        return false;
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') {
        return false;
    }
    // Windows drive prefix counts as absolute
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return false;
    }
    // Traversal segments anywhere in the path
    if trimmed
        .split(['/', '\\'])
        .any(|segment| segment == "..")
    {
        return false;
    }
    true
}
