//! HTTP API: routing and shared state.

mod handlers;
mod middleware;
mod types;

pub use middleware::logging_middleware;
pub use types::*;

use std::sync::Arc;

use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::notify::Notifier;
use crate::store::SignupStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Record store
    pub store: Arc<dyn SignupStore>,
    /// Welcome email sender
    pub notifier: Arc<Notifier>,
    /// Admin export secret; `None` disables the export endpoint.
    pub export_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SignupStore>,
        notifier: Notifier,
        export_key: Option<String>,
    ) -> Self {
        Self {
            store,
            notifier: Arc::new(notifier),
            export_key: export_key.map(Into::into),
        }
    }
}

/// Create the API router with permissive CORS.
pub fn create_router(state: AppState) -> Router {
    create_router_with_cors(state, CorsLayer::permissive())
}

/// Create the API router with a specific CORS policy.
pub fn create_router_with_cors(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/waitlist", post(handlers::join_waitlist))
        .route("/contact", post(handlers::submit_contact))
        .route("/admin/export", get(handlers::export_csv))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
