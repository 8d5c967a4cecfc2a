// Routing of policy requests

use crate::{Error, HttpRequest, HttpResponse, Result, views};
use flashpolicy_config::{AppConfig, PolicyRoute, PolicyView};
use flashpolicy_log::{debug, warn};
use std::sync::Arc;

/// A route handler. Handlers build their document on every call.
pub type HandlerFn = Arc<dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync>;

#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub handler: HandlerFn,
}

/// Exact-path router answering `GET` and `HEAD`.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// One route per configured policy (or the default no-access route).
    pub fn from_config(config: &AppConfig) -> Self {
        let mut router = Self::new();
        for route in config.routes() {
            router.policy_route(route);
        }
        router
    }

    /// Register `handler` for `path`. A later registration for the same
    /// path replaces the earlier one.
    pub fn get<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    {
        let path = path.into();
        self.routes.retain(|route| route.path != path);
        self.routes.push(Route {
            path,
            handler: Arc::new(handler),
        });
        self
    }

    /// Serve a configured policy view at its path.
    pub fn policy_route(&mut self, route: PolicyRoute) -> &mut Self {
        let PolicyRoute { path, view } = route;
        self.get(path, move |_req| serve_view(&view))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.path.as_str())
    }

    /// Dispatch a request. `HEAD` runs the `GET` handler and drops the body.
    pub fn route(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let path = request.route_path();

        let route = self
            .routes
            .iter()
            .find(|route| route.path == path)
            .ok_or_else(|| {
                debug!(target: "flashpolicy::router", "No route for {}", path);
                Error::RouteNotFound(format!("{} {}", request.method, path))
            })?;

        // Method names are case-sensitive.
        match request.method.as_str() {
            "GET" => (route.handler)(request),
            "HEAD" => (route.handler)(request).map(|response| response.with_body(Vec::new())),
            _ => Err(Error::MethodNotAllowed(format!("{} {}", request.method, path))),
        }
    }

    /// Like [`route`](Self::route), with errors rendered as responses.
    pub fn respond(&self, request: &HttpRequest) -> HttpResponse {
        self.route(request).unwrap_or_else(|err| {
            if err.is_server_error() {
                warn!(
                    target: "flashpolicy::router",
                    "{} {} -> {}: {}",
                    request.method,
                    request.route_path(),
                    err.http_status(),
                    err
                );
            }
            HttpResponse::from_error(&err)
        })
    }
}

fn serve_view(view: &PolicyView) -> Result<HttpResponse> {
    views::serve(&view.build()?)
}
