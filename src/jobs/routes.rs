// src/jobs/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn jobs_routes() -> Router {
    Router::new()
        .route(
            "/api/jobs",
            post(handlers::create_job).get(handlers::list_jobs),
        )
        .route(
            "/api/jobs/:id",
            get(handlers::get_job)
                .put(handlers::update_job)
                .delete(handlers::delete_job),
        )
}
