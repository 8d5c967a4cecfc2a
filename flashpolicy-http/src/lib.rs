//! HTTP serving for Flash cross-domain policies.
//!
//! ```no_run
//! use flashpolicy_http::{Router, Server, views};
//!
//! # async fn run() -> flashpolicy_http::Result<()> {
//! let mut router = Router::new();
//! router.get("/crossdomain.xml", |_| views::simple(["media.example.com", "api.example.com"]));
//!
//! Server::bind("0.0.0.0:8843", router).await?.run().await
//! # }
//! ```

pub mod error;
pub mod http;
pub mod routing;
pub mod server;
pub mod status;
pub mod views;

pub use error::{Error, Result};
pub use http::{HttpRequest, HttpResponse};
pub use routing::{HandlerFn, Route, Router};
pub use server::{Server, serve};
pub use status::HttpStatus;
