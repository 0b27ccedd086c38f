//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve page descriptors for every route in the table
//! - Serve the identity client settings
//! - Graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::{AuthBootstrap, AuthStatus, ClientSettings};
use crate::config::ShellConfig;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::response::{PageView, ShellError};
use crate::observability::metrics;
use crate::routing::{Resolution, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub auth: Arc<AuthBootstrap>,
}

/// HTTP server hosting the route table.
pub struct HttpServer {
    router: Router,
    config: ShellConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ShellConfig, table: Arc<RouteTable>, auth: Arc<AuthBootstrap>) -> Self {
        let state = AppState { table, auth };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ShellConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/config.json", get(client_config_handler))
            .fallback(page_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// A clone of the router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "auth": state.auth.status().label() }))
}

async fn client_config_handler(
    State(state): State<AppState>,
) -> Result<Json<ClientSettings>, ShellError> {
    let context = state.auth.context().ok_or(ShellError::NotInitialized)?;
    Ok(Json(context.client_settings()))
}

/// Resolve the request path and describe the page that handles it.
async fn page_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let start = Instant::now();
    let response = match resolve_page(&state, &method, uri.path()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(path = %uri.path(), error = %e, "Page not served");
            e.into_response()
        }
    };
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

async fn resolve_page(state: &AppState, method: &Method, path: &str) -> Result<Response, ShellError> {
    let route = match state.table.resolve(path) {
        Resolution::Matched(route) => route,
        Resolution::NotFound { path } => {
            metrics::record_resolution("none", "not_found");
            return Err(ShellError::NotFound { path });
        }
    };
    let page = route.page();

    if method != Method::GET && method != Method::HEAD {
        return Err(ShellError::MethodNotAllowed);
    }

    if page.needs_auth_state() {
        if !state.auth.is_initialized() {
            metrics::record_resolution(page.name(), "auth_unavailable");
            return Err(ShellError::NotInitialized);
        }
        if let AuthStatus::Failed(reason) = state.auth.settled().await {
            metrics::record_resolution(page.name(), "auth_unavailable");
            return Err(ShellError::AuthUnavailable { page, reason });
        }
    }

    metrics::record_resolution(page.name(), "rendered");
    let view = PageView {
        page,
        title: page.title(),
        pattern: route.pattern(),
        path,
        params: &route.params,
        auth: state.auth.status().label(),
    };
    Ok(Json(view).into_response())
}
