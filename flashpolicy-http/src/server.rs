// HTTP server for policy files

use crate::{HttpRequest, HttpResponse, Result, Router};
use bytes::Bytes;
use flashpolicy_config::AppConfig;
use flashpolicy_log::{debug, info, warn};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode, body::Incoming as IncomingBody};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, ToSocketAddrs};

/// A bound policy server.
///
/// The router is shared read-only across connections; every request
/// builds its own policy document.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    pub async fn bind(addr: impl ToSocketAddrs, router: Router) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    /// Bind to the configured address with the configured routes.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let router = Router::from_config(config);
        Self::bind(config.server.bind_address(), router).await
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until ctrl-c.
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl-c: {}", err);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` completes. In-flight connections finish on
    /// their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!("Serving cross-domain policies on http://{}", addr);
        for path in self.router.paths() {
            info!("Policy route: {}", path);
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down policy server on {}", addr);
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            accept_backoff(&err).await;
                            continue;
                        }
                    };

                    let io = TokioIo::new(stream);
                    let router = self.router.clone();

                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<IncomingBody>| {
                            let router = router.clone();
                            async move { handle_request(req, router).await }
                        });

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                            debug!("Error serving connection from {}: {}", peer, err);
                        }
                    });
                }
            }
        }
    }
}

/// Pause after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

async fn accept_backoff(err: &std::io::Error) {
    warn!(
        "Failed to accept connection: {} (retrying in {}ms)",
        err,
        ACCEPT_BACKOFF.as_millis()
    );
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request = HttpRequest::new(req.method().as_str(), path);
    let response = router.respond(&request);
    debug!(
        target: "flashpolicy::server",
        "{} {} -> {}",
        request.method,
        request.path,
        response.status
    );

    Ok(into_hyper(response))
}

fn into_hyper(response: HttpResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status);
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(response.body)))
        .unwrap_or_else(|err| {
            warn!("Failed to build response: {}", err);
            let mut fallback = Response::new(Full::new(Bytes::from_static(b"Internal Server Error")));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

/// Serve the configured policies until ctrl-c.
pub async fn serve(config: &AppConfig) -> Result<()> {
    Server::from_config(config).await?.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_into_hyper_copies_headers_and_body() {
        let response = HttpResponse::ok()
            .content_type("text/x-cross-domain-policy; charset=utf-8")
            .with_body(b"<cross-domain-policy/>".to_vec());

        let hyper_response = into_hyper(response);
        assert_eq!(hyper_response.status(), StatusCode::OK);
        assert_eq!(
            hyper_response.headers()["content-type"],
            "text/x-cross-domain-policy; charset=utf-8"
        );
    }

    #[test]
    fn test_into_hyper_invalid_status_falls_back() {
        let hyper_response = into_hyper(HttpResponse::new(42));
        assert_eq!(hyper_response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_accept_failure_backs_off() {
        let err = std::io::Error::from_raw_os_error(24);
        let started = std::time::Instant::now();
        accept_backoff(&err).await;
        assert!(started.elapsed() >= ACCEPT_BACKOFF);
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::bind("127.0.0.1:0", Router::new()).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_error_is_io() {
        let first = Server::bind("127.0.0.1:0", Router::new()).await.unwrap();
        let addr = first.local_addr().unwrap();
        let err = Server::bind(addr, Router::new()).await.err().unwrap();
        assert!(matches!(err, Error::Io(_)));
    }
}
