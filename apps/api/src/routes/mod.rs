pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::dashboard::handlers as dashboard;
use crate::extraction::handlers as extraction;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Upload & extraction
        .route(
            "/api/v1/resumes/extract",
            post(extraction::handle_extract).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Store
        .route(
            "/api/v1/resumes",
            get(dashboard::handle_list).post(extraction::handle_save),
        )
        // Export & analytics over the filtered view
        .route(
            "/api/v1/resumes/export/csv",
            get(dashboard::handle_export_csv),
        )
        .route(
            "/api/v1/resumes/export/json",
            get(dashboard::handle_export_json),
        )
        .route("/api/v1/resumes/analytics", get(dashboard::handle_analytics))
        .with_state(state)
}
