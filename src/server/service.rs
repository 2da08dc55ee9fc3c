use http::Method;
use may::coroutine::JoinHandle;
use may_minihttp::{HttpServer, HttpService, Request, Response};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

use super::request::parse_request;
use super::response::{write_empty, write_json_response};
use crate::dispatcher::{DispatchRequest, Dispatcher};
use crate::router::path;

/// Header that short-circuits any request to a 500 before dispatch runs.
const SET_STATUS_HEADER: &str = "x-set-status-code";

/// Header selecting a named example variant.
const EXAMPLE_HEADER: &str = "x-example";

/// How long [`ServerHandle::wait_ready`] probes before giving up.
const READY_TIMEOUT: Duration = Duration::from_millis(250);

/// The HTTP service: glue between the transport and the dispatch engine.
///
/// The service owns only a cloneable dispatcher handle; `may_minihttp`
/// clones it per connection and requests run on independent coroutines.
#[derive(Clone)]
pub struct MockService {
    dispatcher: Dispatcher,
}

impl MockService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Bind the listen address and serve under the may runtime.
    ///
    /// Logs the bound address and the number of handler variants being
    /// served, then returns a [`ServerHandle`] for readiness probing and
    /// shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be
    /// bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid listen address"))?;
        let variants = self.dispatcher.index().read().unwrap().len();
        let handle = HttpServer(self).start(addr)?;
        info!(addr = %addr, variants, "mock server listening");
        Ok(ServerHandle { addr, handle })
    }
}

/// Handle to a running mock server.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the listening socket accepts connections, so callers can
    /// fire requests immediately after startup.
    pub fn wait_ready(&self) -> io::Result<()> {
        let deadline = Instant::now() + READY_TIMEOUT;
        loop {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "mock server did not become ready",
                ));
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Cancel the accept coroutine and wait for it to exit.
    pub fn stop(self) {
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the server exits on its own.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl HttpService for MockService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);

        if parsed.headers.get(SET_STATUS_HEADER).map(String::as_str) == Some("500") {
            info!(method = %parsed.method, path = %parsed.path, status = 500, "debug status override");
            write_empty(res, 500);
            return Ok(());
        }

        let method: Method = match parsed.method.parse() {
            Ok(m) => m,
            Err(_) => {
                write_json_response(res, 404, None);
                return Ok(());
            }
        };

        let request = DispatchRequest {
            method,
            path: path::strip_trailing_slash(&parsed.path).to_string(),
            query: parsed.query_params,
            example: parsed
                .headers
                .get(EXAMPLE_HEADER)
                .cloned()
                .unwrap_or_default(),
            body: parsed.body,
        };

        match self.dispatcher.dispatch(&request) {
            Some(response) => {
                info!(
                    method = %request.method,
                    path = %request.path,
                    status = response.status,
                    "request handled"
                );
                write_json_response(res, response.status, response.body);
            }
            None => {
                info!(method = %request.method, path = %request.path, status = 404, "no handler variant matched");
                write_json_response(res, 404, None);
            }
        }
        Ok(())
    }
}
