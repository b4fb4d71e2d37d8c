//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving. axum only routes; filter
//! dispatch happens in each action's pipeline.

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Upper bound for form and workbook uploads.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let persons = Router::new()
        .route("/index", get(handlers::persons_index))
        .route(
            "/create",
            get(handlers::persons_create_form).post(handlers::persons_create),
        )
        .route(
            "/edit/{person_id}",
            get(handlers::persons_edit_form).post(handlers::persons_edit),
        )
        .route(
            "/delete/{person_id}",
            get(handlers::persons_delete_form).post(handlers::persons_delete),
        )
        .route("/persons-pdf", get(handlers::persons_pdf))
        .route("/persons-csv", get(handlers::persons_csv))
        .route("/persons-excel", get(handlers::persons_excel));

    let countries = Router::new()
        .route("/", get(handlers::countries_index))
        .route(
            "/upload-from-excel",
            get(handlers::countries_upload_form).post(handlers::countries_upload),
        );

    Router::new()
        .route("/", get(handlers::persons_index))
        .route("/health", get(handlers::health_check))
        .nest("/persons", persons)
        .nest("/countries", countries)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::FilterSettings;
    use crate::db::RepositoryFactory;
    use crate::services::WkHtmlToPdfRenderer;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(
            RepositoryFactory::create_local(),
            Arc::new(WkHtmlToPdfRenderer::default()),
            &FilterSettings::default(),
        );
        let _router = create_router(state);
    }
}
