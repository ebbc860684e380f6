// src/cv/handlers/resolved.rs
//! Handler exposing the resolution pipeline over HTTP.

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::cv::models::ResolvedCv;
use crate::cv::resolve::resolve_cv;
use crate::cv::store::load_snapshot;

/// GET /api/jobs/:job_id/cv/resolved - Resolve the canonical CV text for a job
pub async fn get_resolved_cv(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<Json<ResolvedCv>, ApiError> {
    let state = state_lock.read().await;

    let snapshot = load_snapshot(&state.db, &authed.id, &job_id)
        .await
        .map_err(ApiError::DatabaseError)?;

    let resolved = resolve_cv(&snapshot.stores(), &authed.id, &job_id)?;

    info!(
        user_id = %authed.id,
        job_id = %job_id,
        chars = resolved.text.chars().count(),
        "CV resolved"
    );

    Ok(Json(resolved))
}
