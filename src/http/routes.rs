use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session control
        .route("/consultations/start", post(handlers::start_consultation))
        .route(
            "/consultations/stop/:consultation_id",
            post(handlers::stop_consultation),
        )
        .route(
            "/consultations/:consultation_id/status",
            get(handlers::consultation_status),
        )
        .route(
            "/consultations/:consultation_id/transcript",
            get(handlers::consultation_transcript),
        )
        .route(
            "/consultations/:consultation_id/export",
            get(handlers::consultation_export),
        )
        .route(
            "/consultations/:consultation_id/summary",
            post(handlers::consultation_summary),
        )
        .route(
            "/consultations/:consultation_id/sidebar",
            post(handlers::consultation_sidebar),
        )
        // Reference/demo endpoints
        .route("/api/notes", post(handlers::generate_note))
        .route("/api/icd10", get(handlers::search_icd10))
        .route("/api/meds", get(handlers::search_meds))
        .route("/api/templates/:chief", get(handlers::template_fields))
        .route("/api/suggest", get(handlers::suggest))
        .route("/api/health", get(handlers::health_check))
        // Permissive CORS so the charting UI can call from any origin
        .layer(CorsLayer::permissive())
        // Tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
