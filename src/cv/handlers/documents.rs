// src/cv/handlers/documents.rs
//! Handlers for the per-job CV editor document.

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::auth::AuthedUser;
use crate::common::{generate_document_id, ApiError, AppState, Validator};
use crate::cv::models::EditorDocument;
use crate::cv::validators::CvDocumentValidator;

/// PUT /api/jobs/:job_id/cv-document - Save the editor document for a job
pub async fn save_document(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
    Json(document): Json<EditorDocument>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await;

    let validation = CvDocumentValidator.validate(&document);
    if !validation.is_valid {
        return Err(validation.into());
    }

    // The document belongs to a job the user is tracking
    let job_exists: Option<(String,)> =
        sqlx::query_as("SELECT id FROM jobs WHERE id = ? AND user_id = ?")
            .bind(&job_id)
            .bind(&authed.id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    if job_exists.is_none() {
        return Err(ApiError::NotFound("job not found".to_string()));
    }

    let content = serde_json::to_string(&document)
        .map_err(|e| ApiError::InternalServer(format!("failed to serialize document: {}", e)))?;

    let document_id = generate_document_id();
    sqlx::query(
        r#"
        INSERT INTO cv_documents (id, job_id, user_id, content, updated_at)
        VALUES (?, ?, ?, ?, datetime('now'))
        ON CONFLICT(job_id) DO UPDATE SET
            content = excluded.content,
            updated_at = datetime('now')
        "#,
    )
    .bind(&document_id)
    .bind(&job_id)
    .bind(&authed.id)
    .bind(&content)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, job_id = %job_id, "CV document saved");

    Ok(Json(serde_json::json!({
        "message": "CV document saved",
        "jobId": job_id,
    })))
}

/// GET /api/jobs/:job_id/cv-document - Load the editor document for a job
pub async fn get_document(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<Json<EditorDocument>, ApiError> {
    let state = state_lock.read().await;

    let row: Option<(String,)> =
        sqlx::query_as("SELECT content FROM cv_documents WHERE job_id = ? AND user_id = ?")
            .bind(&job_id)
            .bind(&authed.id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    let (content,) = row.ok_or_else(|| ApiError::NotFound("no CV document for this job".to_string()))?;

    let document: EditorDocument = serde_json::from_str(&content)
        .map_err(|e| ApiError::InternalServer(format!("stored document is corrupt: {}", e)))?;

    Ok(Json(document))
}
