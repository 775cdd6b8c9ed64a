//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests against the live route table
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::request::{propagate_request_id_layer, request_id, route_request, set_request_id_layer};
use crate::http::response::into_response;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{HandlerAction, RouteTableHandle};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: RouteTableHandle,
    pub base_path: Arc<str>,
}

/// HTTP front end for the live route table.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `routes`.
    pub fn new(config: RouterConfig, routes: RouteTableHandle) -> Self {
        let state = AppState {
            routes,
            base_path: Arc::from(config.app.base_path.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs))),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("HTTP server shutting down");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Match the request against the live table and dispatch it.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let route_request = route_request(request.uri());

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %route_request.path(),
        "Routing request"
    );

    let table = state.routes.load();
    let path = route_request.path().to_string();
    let Some(action) = table.route(route_request) else {
        tracing::warn!(request_id = %request_id, path = %path, generation = table.generation(), "No route matched");
        metrics::record_request(StatusCode::NOT_FOUND.as_u16(), start_time);
        return (StatusCode::NOT_FOUND, "No matching route found").into_response();
    };

    if let HandlerAction::Redirect { location, permanent } = &action {
        tracing::info!(
            request_id = %request_id,
            path = %path,
            location = %location,
            permanent,
            "Redirecting"
        );
        metrics::record_redirect(*permanent);
    }

    metrics::record_request(action.status().as_u16(), start_time);
    into_response(action, &state.base_path)
}
