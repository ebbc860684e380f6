// src/cv/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

pub fn cv_routes() -> Router {
    Router::new()
        // Per-job editor document
        .route(
            "/api/jobs/:id/cv-document",
            put(handlers::save_document).get(handlers::get_document),
        )
        // Shared raw CV data
        .route(
            "/api/cv-data",
            get(handlers::get_cv_data).put(handlers::update_cv_data),
        )
        .route("/api/cv-data/upload", post(handlers::upload_cv))
        .route("/api/cv-data/extract", post(handlers::extract_cv_data))
        // Resolution
        .route("/api/jobs/:id/cv/resolved", get(handlers::get_resolved_cv))
        // AI-request builders
        .route(
            "/api/jobs/:id/ai/cover-letter",
            post(handlers::generate_cover_letter),
        )
        .route(
            "/api/jobs/:id/ai/interview-prep",
            post(handlers::generate_interview_prep),
        )
}
