//! Template path matching.
//!
//! A template path is a `/`-separated string whose `{name}` segments are
//! parameter placeholders. Matching is strictly per segment: no regex, no
//! wildcard expansion, and the empty leading segment produced by a leading
//! `/` participates like any other.

/// Whether a segment is a `{name}` placeholder.
fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Test whether a concrete request path matches a template path.
///
/// Segment counts must be equal; placeholder segments match any concrete
/// segment, everything else must be literally equal.
pub fn matches(concrete: &str, template: &str) -> bool {
    let mut concrete_segments = concrete.split('/');
    let mut template_segments = template.split('/');
    loop {
        match (concrete_segments.next(), template_segments.next()) {
            (Some(c), Some(t)) => {
                if !is_placeholder(t) && c != t {
                    return false;
                }
            }
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Drop the final `/`-delimited segment of a template.
pub fn parent(template: &str) -> &str {
    match template.rfind('/') {
        Some(idx) => &template[..idx],
        None => "",
    }
}

/// The final `/`-delimited segment of a path.
pub fn last_segment(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Whether the final segment of a template is a placeholder.
pub fn last_segment_is_param(template: &str) -> bool {
    is_placeholder(last_segment(template))
}

/// Remove one trailing `/` when the path is longer than one byte.
pub fn strip_trailing_slash(path: &str) -> &str {
    if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

/// Drop a `#fragment` suffix.
pub fn strip_fragment(path: &str) -> &str {
    match path.find('#') {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Number of placeholder segments in a template.
///
/// Used by the dispatch tie-break: templates with fewer placeholders are
/// tried first, so `/users/me` wins over `/users/{id}`.
pub fn param_count(template: &str) -> usize {
    template.split('/').filter(|s| is_placeholder(s)).count()
}
