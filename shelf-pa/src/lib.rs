//! shelf-pa library - Persona Analytics module
//!
//! Serves tier grades and persona similarity rankings to the page renderer.
//! Persona data is read from the application database over a read-only
//! connection.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
    /// Similar personas returned when a request gives no limit
    pub similar_limit: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, similar_limit: usize) -> Self {
        Self { db, similar_limit }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let grades = Router::new()
        .route("/api/tiers", get(api::list_tiers))
        .route("/api/grade/percentile/:value", get(api::grade_percentile))
        .route("/api/grade/score/:value", get(api::grade_score))
        .route("/api/grade/rank", get(api::grade_rank));

    let personas = Router::new()
        .route("/api/personas/stats", get(api::persona_stats))
        .route("/api/personas/compare", post(api::compare_personas))
        .route("/api/personas/:id/grade", get(api::persona_grade))
        .route("/api/personas/:id/profile", get(api::persona_profile))
        .route("/api/personas/:id/similar", get(api::similar_personas));

    Router::new()
        .merge(grades)
        .merge(personas)
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
