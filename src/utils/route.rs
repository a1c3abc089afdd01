//! Route pattern utilities.

/// Reduce a navigation target to its bare path: query and fragment dropped,
/// leading slash ensured, trailing slash removed (except for `/`).
pub fn normalize_path(raw: &str) -> String {
    let path = raw
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Match `path` against a pattern such as `/campaigns/:id`.
///
/// `:name` segments match any single non-empty segment and are returned in
/// order. Returns `None` when the path does not match.
pub fn match_pattern(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let path = normalize_path(path);
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        match expected.strip_prefix(':') {
            Some(name) => params.push((name.to_string(), (*actual).to_string())),
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}
