use std::collections::HashMap;
use std::num::ParseIntError;

/// Decoded pagination request.
///
/// `found` is reported whenever the `limit` key was present, even when the
/// value failed to parse. Negative values pass through untouched; clamping
/// is the dispatch engine's job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
    pub found: bool,
}

/// Extract `limit`/`offset` from query parameters.
///
/// Absent `limit` means no pagination was requested and no error is
/// reported. A non-parsable integer is returned alongside the page so the
/// caller can log it and proceed with whatever was decoded.
pub fn decode(query: &HashMap<String, String>) -> (Page, Option<ParseIntError>) {
    let mut page = Page::default();
    let mut err = None;

    let Some(raw_limit) = query.get("limit") else {
        return (page, None);
    };
    match raw_limit.parse() {
        Ok(limit) => page.limit = limit,
        Err(e) => err = Some(e),
    }

    if let Some(raw_offset) = query.get("offset") {
        match raw_offset.parse() {
            Ok(offset) => page.offset = offset,
            Err(e) => err = Some(e),
        }
    }

    page.found = true;
    (page, err)
}
