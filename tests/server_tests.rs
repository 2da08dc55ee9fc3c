use mockbird::dispatcher::{build_index, Dispatcher};
use mockbird::server::{MockService, ServerHandle};
use mockbird::spec::Document;
use serde_json::{json, Value};
use std::net::{SocketAddr, TcpListener};

mod common;
use common::http::{content_type, parse_response, send_request};
use common::test_server::setup_may_runtime;

/// Test fixture that serves a spec string over a real socket and shuts the
/// server down on drop.
struct MockServer {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl MockServer {
    fn start(spec_yaml: &str) -> Self {
        setup_may_runtime();

        let doc: Document = serde_yaml::from_str(spec_yaml).expect("failed to parse YAML spec");
        let index = build_index(&doc).expect("failed to build index");
        let service = MockService::new(Dispatcher::new(index));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let handle = service.start(addr).unwrap();
        handle.wait_ready().unwrap();

        let addr = handle.addr();
        Self {
            handle: Some(handle),
            addr,
        }
    }

    fn get(&self, path: &str) -> String {
        send_request(
            &self.addr,
            &format!("GET {path} HTTP/1.1\r\nHost: test\r\n\r\n"),
        )
    }

    fn get_with_header(&self, path: &str, header: &str) -> String {
        send_request(
            &self.addr,
            &format!("GET {path} HTTP/1.1\r\nHost: test\r\n{header}\r\n\r\n"),
        )
    }

    fn post_json(&self, path: &str, body: &Value) -> String {
        let body = body.to_string();
        send_request(
            &self.addr,
            &format!(
                "POST {path} HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            ),
        )
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

fn json_body(raw: &str) -> Value {
    let (_, body) = parse_response(raw);
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("invalid JSON body {body:?}: {e}"))
}

const PING_SPEC: &str = r#"
info: { title: Ping, version: "0.1.0" }
paths:
  /ping:
    get:
      responses:
        "200":
          content:
            application/json:
              example: { ok: true }
"#;

const PROFILE_SPEC: &str = r#"
paths:
  /user:
    get:
      responses:
        "200":
          content:
            application/json:
              examples:
                a: { value: { n: 1 } }
                b: { value: { n: 2 } }
"#;

const USERS_SPEC: &str = r#"
paths:
  /users:
    get:
      parameters:
        - { name: limit, in: query, schema: { type: integer } }
        - { name: offset, in: query, schema: { type: integer } }
      responses:
        "200":
          content:
            application/json:
              example:
                - { id: u1, name: x }
                - { id: u2, name: y }
    post:
      responses:
        "201":
          description: created
  /users/{id}:
    get:
      parameters:
        - { name: id, in: path, required: true, schema: { type: string } }
      responses:
        "200":
          content:
            application/json: {}
"#;

#[test]
fn test_static_example() {
    let server = MockServer::start(PING_SPEC);
    let raw = server.get("/ping");
    let (status, _) = parse_response(&raw);
    assert_eq!(status, 200);
    assert_eq!(content_type(&raw).as_deref(), Some("application/json"));
    assert_eq!(json_body(&raw), json!({"ok": true}));
}

#[test]
fn test_trailing_slash_is_stripped() {
    let server = MockServer::start(PING_SPEC);
    let raw = server.get("/ping/");
    let (status, _) = parse_response(&raw);
    assert_eq!(status, 200);
    assert_eq!(json_body(&raw), json!({"ok": true}));
}

#[test]
fn test_named_example_selection() {
    let server = MockServer::start(PROFILE_SPEC);

    let raw = server.get("/user");
    assert_eq!(json_body(&raw), json!({"n": 1}));

    let raw = server.get_with_header("/user", "X-Example: b");
    assert_eq!(json_body(&raw), json!({"n": 2}));
}

#[test]
fn test_collection_and_item_lookup() {
    let server = MockServer::start(USERS_SPEC);

    let raw = server.get("/users/u2");
    let (status, _) = parse_response(&raw);
    assert_eq!(status, 200);
    assert_eq!(json_body(&raw), json!({"id": "u2", "name": "y"}));

    let raw = server.get("/users/u3");
    let (status, body) = parse_response(&raw);
    assert_eq!(status, 404);
    assert!(body.is_empty());
}

#[test]
fn test_post_append_visibility() {
    let server = MockServer::start(USERS_SPEC);

    let raw = server.post_json("/users", &json!({"id": "u3", "name": "z"}));
    let (status, _) = parse_response(&raw);
    assert_eq!(status, 201);
    assert_eq!(json_body(&raw), json!({"id": "u3", "name": "z"}));

    // The appended element is the last entry of the collection.
    let raw = server.get("/users");
    let items = match json_body(&raw) {
        Value::Array(items) => items,
        other => panic!("expected array, got {other}"),
    };
    assert_eq!(items.len(), 3);
    assert_eq!(items[2], json!({"id": "u3", "name": "z"}));

    // And the item endpoint can now resolve it.
    let raw = server.get("/users/u3");
    let (status, _) = parse_response(&raw);
    assert_eq!(status, 200);
    assert_eq!(json_body(&raw), json!({"id": "u3", "name": "z"}));
}

#[test]
fn test_pagination_slice() {
    let server = MockServer::start(USERS_SPEC);
    let raw = server.get("/users?limit=1&offset=1");
    let (status, _) = parse_response(&raw);
    assert_eq!(status, 200);
    assert_eq!(json_body(&raw), json!([{"id": "u2", "name": "y"}]));
}

#[test]
fn test_pagination_offset_past_end_is_empty_body() {
    let server = MockServer::start(USERS_SPEC);
    let raw = server.get("/users?limit=1&offset=9");
    let (status, body) = parse_response(&raw);
    assert_eq!(status, 200);
    assert!(body.is_empty());
}

#[test]
fn test_debug_status_header_short_circuits() {
    let server = MockServer::start(PING_SPEC);
    let raw = server.get_with_header("/ping", "X-Set-Status-Code: 500");
    let (status, body) = parse_response(&raw);
    assert_eq!(status, 500);
    assert!(body.is_empty());
}

#[test]
fn test_unmatched_path_is_404() {
    let server = MockServer::start(PING_SPEC);
    let raw = server.get("/nope");
    let (status, body) = parse_response(&raw);
    assert_eq!(status, 404);
    assert!(body.is_empty());
}
