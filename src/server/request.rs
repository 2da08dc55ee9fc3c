use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::warn;

use crate::router::path;

/// Parsed HTTP request data used by `MockService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

pub fn parse_query_params(raw_path: &str) -> HashMap<String, String> {
    if let Some(pos) = raw_path.find('?') {
        let query_str = &raw_path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Extract method, path, headers, query parameters, and the JSON body from
/// a `may_minihttp::Request`.
///
/// The path has its query string and fragment removed. A body that fails to
/// decode as JSON is logged and reported as `None`; the request still
/// proceeds.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = path::strip_fragment(raw_path.split('?').next().unwrap_or("/")).to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let query_params = parse_query_params(&raw_path);

    let body = {
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => match serde_json::from_str(&body_str) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(path = %path, error = %e, "request body is not valid JSON");
                    None
                }
            },
            _ => None,
        }
    };

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
    }
}
