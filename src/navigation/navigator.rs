//! Navigation event loop.
//!
//! # Responsibilities
//! - Apply navigation events to the history
//! - Resolve the new location against the route table
//! - Hold auth-dependent pages until the auth bootstrap settles
//! - Hand the page and its params to the renderer
//!
//! # Design Decisions
//! - Events are processed strictly one at a time
//! - Resolution is synchronous; the only await is the auth settle
//! - A failed bootstrap blocks auth-dependent pages, not public ones

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::auth::{AuthBootstrap, AuthContext, AuthStatus};
use crate::navigation::history::History;
use crate::observability::metrics;
use crate::routing::{PathParams, Page, Resolution, RouteTable};

/// A navigation request from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Push(String),
    Replace(String),
    Back,
    Forward,
}

/// Renders pages chosen by the navigator.
pub trait PageRenderer: Send {
    /// Render `page`. `auth` is present once the bootstrap settled
    /// successfully.
    fn render(&mut self, page: Page, params: &PathParams, auth: Option<Arc<AuthContext>>);

    /// Nothing in the route table matched `path`.
    fn not_found(&mut self, path: &str);

    /// `page` needs auth state but the bootstrap is unavailable.
    fn auth_unavailable(&mut self, page: Page, reason: &str) {
        let _ = (page, reason);
    }
}

/// What a single navigation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Rendered { page: Page, params: PathParams },
    NotFound { path: String },
    AuthUnavailable { page: Page, reason: String },
    /// Back at the first entry, or forward at the last.
    Unchanged,
}

/// Client-side router: history plus route resolution plus rendering.
pub struct Navigator<R> {
    table: Arc<RouteTable>,
    auth: Arc<AuthBootstrap>,
    history: History,
    renderer: R,
}

impl<R: PageRenderer> Navigator<R> {
    pub fn new(
        table: Arc<RouteTable>,
        auth: Arc<AuthBootstrap>,
        renderer: R,
        initial_path: &str,
    ) -> Self {
        Self {
            table,
            auth,
            history: History::new(initial_path),
            renderer,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Render the initial location.
    pub async fn start(&mut self) -> NavigationOutcome {
        let path = self.history.current().to_string();
        self.show(&path).await
    }

    /// Apply one event and render the resulting location.
    pub async fn navigate(&mut self, event: NavigationEvent) -> NavigationOutcome {
        let path = match event {
            NavigationEvent::Push(path) => {
                self.history.push(path.as_str());
                path
            }
            NavigationEvent::Replace(path) => {
                self.history.replace(path.as_str());
                path
            }
            NavigationEvent::Back => match self.history.back() {
                Some(path) => path.to_string(),
                None => return NavigationOutcome::Unchanged,
            },
            NavigationEvent::Forward => match self.history.forward() {
                Some(path) => path.to_string(),
                None => return NavigationOutcome::Unchanged,
            },
        };
        self.show(&path).await
    }

    /// Process events until the channel closes or shutdown fires, then
    /// return the renderer.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<NavigationEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> R {
        self.start().await;
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        self.navigate(event).await;
                    }
                    None => break,
                },
                _ = shutdown.recv() => {
                    tracing::debug!("Navigator received shutdown signal");
                    break;
                }
            }
        }
        self.renderer
    }

    async fn show(&mut self, path: &str) -> NavigationOutcome {
        let (page, params) = match self.table.resolve(path) {
            Resolution::Matched(m) => (m.page(), m.params),
            Resolution::NotFound { path } => {
                tracing::debug!(path = %path, "No route matched");
                metrics::record_resolution("none", "not_found");
                self.renderer.not_found(&path);
                return NavigationOutcome::NotFound { path };
            }
        };

        let auth = if page.needs_auth_state() {
            match self.settled_auth().await {
                Ok(context) => Some(context),
                Err(reason) => {
                    tracing::warn!(page = %page, reason = %reason, "Auth unavailable for page");
                    metrics::record_resolution(page.name(), "auth_unavailable");
                    self.renderer.auth_unavailable(page, &reason);
                    return NavigationOutcome::AuthUnavailable { page, reason };
                }
            }
        } else {
            self.auth.ready_context().ok()
        };

        tracing::debug!(path = %path, page = %page, "Rendering page");
        metrics::record_resolution(page.name(), "rendered");
        self.renderer.render(page, &params, auth);
        NavigationOutcome::Rendered { page, params }
    }

    async fn settled_auth(&self) -> Result<Arc<AuthContext>, String> {
        if !self.auth.is_initialized() {
            return Err("auth bootstrap has not been initialized".to_string());
        }
        match self.auth.settled().await {
            AuthStatus::Ready => self.auth.ready_context().map_err(|e| e.to_string()),
            AuthStatus::Failed(reason) => Err(reason),
            AuthStatus::Pending => Err("auth bootstrap has not settled".to_string()),
        }
    }
}
