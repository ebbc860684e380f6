// src/profile/routes.rs

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers;

pub fn profile_routes() -> Router {
    Router::new()
        .route("/api/profile", get(handlers::get_profile))
        .route("/api/profile", put(handlers::update_profile))
}
