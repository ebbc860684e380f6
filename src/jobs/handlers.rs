// src/jobs/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{CreateJobRequest, Job, JobListResponse, UpdateJobRequest};
use super::validators::JobValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_job_id, ApiError, AppState, Validator};

/// POST /api/jobs - Track a new job posting
pub async fn create_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;

    let validation = JobValidator.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let job_id = generate_job_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO jobs (id, user_id, title, company, location, posting, url, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'saved', ?, ?)
        "#,
    )
    .bind(&job_id)
    .bind(&authed.id)
    .bind(&request.title)
    .bind(request.company.as_deref())
    .bind(request.location.as_deref())
    .bind(request.posting.as_deref())
    .bind(request.url.as_deref())
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, job_id = %job_id, "Job tracked");

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs - List the user's tracked jobs
pub async fn list_jobs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<JobListResponse>, ApiError> {
    let state = state_lock.read().await;

    let jobs = sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let total = jobs.len();
    Ok(Json(JobListResponse { jobs, total }))
}

/// GET /api/jobs/:id - Get one tracked job
pub async fn get_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let state = state_lock.read().await;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ? AND user_id = ?")
        .bind(&job_id)
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("job not found".to_string()))?;

    Ok(Json(job))
}

/// PUT /api/jobs/:id - Update a tracked job
pub async fn update_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<Job>, ApiError> {
    let state = state_lock.read().await;

    let validation = JobValidator.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let result = sqlx::query(
        r#"
        UPDATE jobs SET
            title = COALESCE(?, title),
            company = COALESCE(?, company),
            location = COALESCE(?, location),
            posting = COALESCE(?, posting),
            url = COALESCE(?, url),
            status = COALESCE(?, status),
            updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(request.title.as_deref())
    .bind(request.company.as_deref())
    .bind(request.location.as_deref())
    .bind(request.posting.as_deref())
    .bind(request.url.as_deref())
    .bind(request.status.as_deref())
    .bind(&job_id)
    .bind(&authed.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("job not found".to_string()));
    }

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, job_id = %job_id, "Job updated");

    Ok(Json(job))
}

/// DELETE /api/jobs/:id - Stop tracking a job
pub async fn delete_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await;

    // The per-job CV document goes with the job
    sqlx::query("DELETE FROM cv_documents WHERE job_id = ? AND user_id = ?")
        .bind(&job_id)
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let result = sqlx::query("DELETE FROM jobs WHERE id = ? AND user_id = ?")
        .bind(&job_id)
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("job not found".to_string()));
    }

    info!(user_id = %authed.id, job_id = %job_id, "Job deleted");

    Ok(Json(serde_json::json!({ "message": "Job deleted" })))
}
