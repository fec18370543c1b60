//! HTTP server implementation

use crate::app::{log_request, App};
use crate::error::ApiError;
use crate::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address `{addr}`: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) async fn serve<F>(app: App, addr: &str, signal: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let addr: SocketAddr = addr.parse().map_err(|source| ServerError::InvalidAddr {
        addr: addr.to_string(),
        source,
    })?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!("fastitems server running on http://{}", addr);

    let app = Arc::new(app);
    tokio::pin!(signal);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, remote_addr) = match accepted {
                    Ok(conn) => conn,
                    Err(err) => {
                        warn!(error = %err, "failed to accept connection");
                        continue;
                    }
                };
                let io = TokioIo::new(stream);
                let app = app.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: hyper::Request<Incoming>| {
                        let app = app.clone();
                        async move { Ok::<_, Infallible>(handle_request(&app, req).await) }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!(remote = %remote_addr, "Connection error: {}", err);
                    }
                });
            }
            _ = &mut signal => {
                info!("shutdown signal received, no longer accepting connections");
                break;
            }
        }
    }

    Ok(())
}

/// Collect the body under the configured limit, then dispatch
async fn handle_request(app: &App, req: hyper::Request<Incoming>) -> Response {
    let start = Instant::now();
    let limit = app.get_body_limit();
    let (parts, body) = req.into_parts();

    match Limited::new(body, limit).collect().await {
        Ok(collected) => {
            app.handle(http::Request::from_parts(parts, collected.to_bytes()))
                .await
        }
        Err(err) => {
            let response = if err.downcast_ref::<LengthLimitError>().is_some() {
                ApiError::payload_too_large(limit)
            } else {
                ApiError::bad_request("Failed to read request body").with_internal(err.to_string())
            }
            .into_response();
            log_request(&parts.method, parts.uri.path(), response.status(), start);
            response
        }
    }
}
