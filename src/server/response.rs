use may_minihttp::Response;
use serde_json::Value;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Write a JSON response. `body: None` writes headers only, which is how
/// empty pagination pages and the 404 path behave.
pub fn write_json_response(res: &mut Response, status: u16, body: Option<Value>) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    if let Some(body) = body {
        res.body_vec(serde_json::to_vec(&body).unwrap_or_default());
    }
}

/// Write a bare status line with no headers and no body.
pub fn write_empty(res: &mut Response, status: u16) {
    res.status_code(status as usize, status_reason(status));
}
