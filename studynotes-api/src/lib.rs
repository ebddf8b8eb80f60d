//! studynotes-api library
//!
//! HTTP service that turns free-text study notes into a summary and
//! flashcards via an LLM, stores each session, and serves them back per user.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod service;
pub mod store;

pub use crate::api::AuthMode;
pub use crate::error::{ApiError, ApiResult};
pub use crate::service::StudySessionService;

/// Application state shared across HTTP handlers
///
/// Clients are built once at startup and injected here; handlers never
/// reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StudySessionService>,
    pub auth: AuthMode,
}

impl AppState {
    pub fn new(service: StudySessionService, auth: AuthMode) -> Self {
        Self {
            service: Arc::new(service),
            auth,
        }
    }
}

/// Build application router
///
/// `/analyze` and `/review` sit behind the auth middleware (a pass-through
/// when auth is disabled); `/health` is always public.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/analyze", post(api::analyze_notes))
        .route("/review", get(api::review_sessions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    Router::new()
        .merge(protected)
        .merge(api::health_routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
