//! Tiny HTTP server for tests. Paths are either served right away with a fixed response, or
//! expected, in which case the test decides when and what to respond, and gets to see the request.

use http_body_util::Full;
use hyper::{Request, Response, server::conn::http1, service::Service};
use hyper_util::rt::TokioIo;
use std::{
    collections::HashMap,
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard},
};
use tokio::{net::TcpListener, sync::oneshot};

pub use hyper::{self, StatusCode, body::Bytes};

/// Request as seen by the server, without its body.
pub type SeenRequest = Request<()>;

struct Pending {
    request_tx: oneshot::Sender<SeenRequest>,
    response_rx: oneshot::Receiver<(StatusCode, Bytes)>,
}

#[derive(Default)]
struct State {
    /// Made by [`Mock::expect`], before the incoming HTTP request.
    expectations: HashMap<String, Pending>,

    /// Made by [`Mock::serve`]. Served any number of times.
    routes: HashMap<String, (StatusCode, Bytes)>,

    unexpected: Vec<String>,
}

pub struct Mock {
    pub port: u16,
    state: Arc<Mutex<State>>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    // Test which panicked while holding the lock is already failing anyway.
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl Mock {
    /// Create new [`Mock`], and bind it to a random port.
    pub async fn bind() -> std::io::Result<Mock> {
        let state = Arc::new(Mutex::new(State::default()));

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                let stream = match listener.accept().await {
                    Ok((stream, _)) => stream,
                    Err(err) => {
                        log::warn!("Could not accept a connection: {err}.");
                        continue;
                    }
                };
                let io = TokioIo::new(stream);

                let state = Arc::clone(&state_clone);
                tokio::task::spawn(async move {
                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, MockRequest { state })
                        .await
                    {
                        log::warn!("Connection failed: {err}.");
                    }
                });
            }
        });

        Ok(Mock { port, state })
    }

    /// Full URL of `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://localhost:{}{path}", self.port)
    }

    /// Expect a single request to `path`. It will hang until [`Expectation::respond`] is called.
    pub async fn expect(&self, path: impl Into<String>) -> Expectation {
        let path = path.into();
        log::info!("Expecting '{path}'.");

        let (request_tx, request_rx) = oneshot::channel();
        let (response_tx, response_rx) = oneshot::channel();
        lock(&self.state).expectations.insert(
            path,
            Pending {
                request_tx,
                response_rx,
            },
        );

        Expectation {
            request_rx,
            response_tx,
        }
    }

    /// Respond to every request to `path` with `status` and `body`.
    pub fn serve(&self, path: impl Into<String>, status: StatusCode, body: impl Into<Bytes>) {
        lock(&self.state)
            .routes
            .insert(path.into(), (status, body.into()));
    }

    /// Requests which were neither expected nor served.
    pub fn unexpected(&self) -> Vec<String> {
        lock(&self.state).unexpected.clone()
    }
}

pub struct Expectation {
    request_rx: oneshot::Receiver<SeenRequest>,
    response_tx: oneshot::Sender<(StatusCode, Bytes)>,
}

impl Expectation {
    /// Respond with `200 OK` and `payload` once the request arrives. Returns the request.
    pub async fn respond(self, payload: Bytes) -> SeenRequest {
        self.respond_with_status(StatusCode::OK, payload).await
    }

    pub async fn respond_with_status(self, status: StatusCode, payload: Bytes) -> SeenRequest {
        log::info!("Responding with {status}.");
        if self.response_tx.send((status, payload)).is_err() {
            log::warn!("Connection is gone.");
        }

        match self.request_rx.await {
            Ok(request) => request,
            Err(_) => panic!("expected request never came"),
        }
    }
}

struct MockRequest {
    state: Arc<Mutex<State>>,
}

fn response(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
}

impl Service<Request<hyper::body::Incoming>> for MockRequest {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<hyper::body::Incoming>) -> Self::Future {
        log::info!("Incoming request '{}'.", request.uri());
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let path = request.uri().path().to_owned();
            let (parts, _) = request.into_parts();
            let seen = Request::from_parts(parts, ());

            let pending = lock(&state).expectations.remove(&path);
            if let Some(pending) = pending {
                let uri = seen.uri().to_string();
                let _ = pending.request_tx.send(seen);
                return Ok(match pending.response_rx.await {
                    Ok((status, payload)) => response(status, payload),
                    Err(_) => {
                        log::warn!("Expectation for '{uri}' was dropped.");
                        response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Bytes::from_static(b"dropped"),
                        )
                    }
                });
            }

            let route = lock(&state).routes.get(&path).cloned();
            if let Some((status, body)) = route {
                return Ok(response(status, body));
            }

            log::warn!("Unexpected '{}'.", seen.uri());
            lock(&state).unexpected.push(seen.uri().to_string());
            Ok(response(
                StatusCode::IM_A_TEAPOT,
                Bytes::from_static(b"unexpected"),
            ))
        })
    }
}
