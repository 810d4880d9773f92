//! HTTP/1 serve loop for an [`App`].
//!
//! ```rust,no_run
//! use genesis_server::{App, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), genesis_server::ServerError> {
//!     let mut app = App::new();
//!     app.map_get("/ping", || async { "pong" });
//!
//!     let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
//!     Server::new(app, config).run().await
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use genesis_core::ProblemDetails;
use genesis_extract::response::problem_response;
use genesis_extract::Response;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::app::App;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

impl App {
    /// Freezes the application for concurrent dispatch.
    #[must_use]
    pub fn into_service(self) -> Arc<App> {
        Arc::new(self)
    }
}

/// Serves an [`App`] over HTTP/1.
#[derive(Debug)]
pub struct Server {
    app: Arc<App>,
    config: ServerConfig,
}

impl Server {
    /// Creates a server.
    #[must_use]
    pub fn new(app: App, config: ServerConfig) -> Self {
        Self {
            app: app.into_service(),
            config,
        }
    }

    /// The application being served.
    #[must_use]
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("Invalid address '{}': {e}", self.config.http_addr()))
        })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("Failed to bind to {addr}: {e}")))?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        tracing::info!(addr = %listener.local_addr()?, routes = self.app.routes().count(), "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(err) = server.handle_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(%remote_addr, error = %err, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(err) => tracing::error!(error = %err, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting");
                    break;
                }
            }
        }

        let timeout = server.config.shutdown_timeout();
        tokio::select! {
            () = tracker.wait_idle() => tracing::info!("all connections closed"),
            () = tokio::time::sleep(timeout) => tracing::warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached"
            ),
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let server = Arc::clone(self);
        let service = service_fn(move |request: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(request).await) }
        });

        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        tokio::pin!(conn);
        tokio::select! {
            result = conn.as_mut() => return result,
            () = shutdown.recv() => {
                tracing::debug!(%remote_addr, "draining connection for shutdown");
                conn.as_mut().graceful_shutdown();
            }
        }
        conn.await
    }

    async fn handle_request(&self, request: Request<Incoming>) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let timeout = self.config.request_timeout();

        let (parts, body) = request.into_parts();
        let limited = Limited::new(body, self.config.max_body_bytes());
        let body = match tokio::time::timeout(timeout, limited.collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(err)) if err.is::<LengthLimitError>() => {
                return error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Request body exceeds {} bytes", self.config.max_body_bytes()),
                );
            }
            Ok(Err(err)) => {
                tracing::debug!(%method, %path, error = %err, "failed to read request body");
                return error_response(StatusCode::BAD_REQUEST, format!("Failed to read request body: {err}"));
            }
            Err(_) => {
                tracing::warn!(%method, %path, "request body timed out");
                return error_response(StatusCode::REQUEST_TIMEOUT, "Request body collection timed out");
            }
        };

        let request = Request::from_parts(parts, body);
        match tokio::time::timeout(timeout, self.app.handle(request)).await {
            Ok(response) => {
                tracing::debug!(%method, %path, status = response.status().as_u16(), "request handled");
                response
            }
            Err(_) => {
                tracing::warn!(%method, %path, "endpoint timed out");
                error_response(StatusCode::GATEWAY_TIMEOUT, "Endpoint execution timed out")
            }
        }
    }
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    let title = status.canonical_reason().unwrap_or("Error");
    problem_response(&ProblemDetails::new(status, title).with_detail(detail))
}
