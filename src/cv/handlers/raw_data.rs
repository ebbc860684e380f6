// src/cv/handlers/raw_data.rs
//! Handlers for the shared raw CV data blob: the uploaded text layer and the
//! AI-extracted structured layer.

use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::auth::AuthedUser;
use crate::common::{generate_cv_data_id, ApiError, AppState, Validator};
use crate::cv::models::{RawCvData, UpdateCvDataRequest};
use crate::cv::validators::CvDataValidator;

/// GET /api/cv-data - Get the user's raw CV data
pub async fn get_cv_data(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<RawCvData>, ApiError> {
    let state = state_lock.read().await;

    let row: Option<(Option<String>, Option<String>)> =
        sqlx::query_as("SELECT structured, raw_text FROM cv_data WHERE user_id = ?")
            .bind(&authed.id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    let data = match row {
        Some((structured, raw_text)) => RawCvData {
            structured: structured.and_then(|s| serde_json::from_str(&s).ok()),
            raw_text,
        },
        None => RawCvData::default(),
    };

    Ok(Json(data))
}

/// PUT /api/cv-data - Update the user's raw CV data
///
/// Absent fields keep their stored values, so the structured layer and the
/// raw-text layer can be written independently.
pub async fn update_cv_data(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateCvDataRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await;

    let validation = CvDataValidator.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let structured_json = match &request.structured {
        Some(value) => Some(
            serde_json::to_string(value)
                .map_err(|e| ApiError::InternalServer(format!("failed to serialize: {}", e)))?,
        ),
        None => None,
    };

    upsert_cv_data(
        &state.db,
        &authed.id,
        structured_json.as_deref(),
        request.raw_text.as_deref(),
    )
    .await?;

    info!(user_id = %authed.id, "Raw CV data updated");

    Ok(Json(serde_json::json!({ "message": "CV data updated" })))
}

/// POST /api/cv-data/upload - Upload a CV as a PDF
///
/// The text is extracted with pdf-extract and stored as the raw-text layer.
pub async fn upload_cv(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;

    info!(user_id = %authed.id, "User uploading CV");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart body".to_string()))?
    {
        if field.name() == Some("cv") {
            let filename = field.file_name().unwrap_or("cv.pdf").to_string();

            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;

            if !filename.to_lowercase().ends_with(".pdf") {
                return Err(ApiError::BadRequest(
                    "Only PDF files are allowed".to_string(),
                ));
            }

            let text = pdf_extract::extract_text_from_mem(&data).map_err(|e| {
                error!(error = %e, user_id = %authed.id, "Failed to extract text from PDF");
                ApiError::ProcessingError("Could not extract text from the PDF".to_string())
            })?;

            let char_count = text.trim().chars().count();
            if char_count == 0 {
                warn!(user_id = %authed.id, "Uploaded PDF contained no extractable text");
                return Err(ApiError::BadRequest(
                    "The PDF contains no extractable text".to_string(),
                ));
            }

            upsert_cv_data(&state.db, &authed.id, None, Some(&text)).await?;

            info!(
                user_id = %authed.id,
                chars = char_count,
                "CV uploaded and text extracted"
            );

            return Ok((
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "message": "CV uploaded",
                    "chars": char_count,
                })),
            ));
        }
    }

    Err(ApiError::BadRequest("No CV file provided".to_string()))
}

/// POST /api/cv-data/extract - Run the AI structured extraction over the
/// stored raw CV text and save the result as the structured layer.
pub async fn extract_cv_data(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await;

    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT raw_text FROM cv_data WHERE user_id = ?")
            .bind(&authed.id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    let raw_text = row
        .and_then(|(raw_text,)| raw_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest("Upload a CV before running the extraction".to_string())
        })?;

    info!(user_id = %authed.id, "Starting CV structured extraction");

    let extracted = state
        .openai_service
        .extract_cv_data(&raw_text)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "CV extraction failed");
            ApiError::ServiceUnavailable(format!("AI service error: {}", e))
        })?;

    let structured_json = serde_json::to_string(&extracted)
        .map_err(|e| ApiError::InternalServer(format!("failed to serialize: {}", e)))?;

    upsert_cv_data(&state.db, &authed.id, Some(&structured_json), None).await?;

    info!(user_id = %authed.id, "CV structured extraction stored");

    Ok(Json(serde_json::json!({
        "message": "CV extracted",
        "structured": extracted,
    })))
}

/// Upsert the single cv_data row for a user. `None` fields keep their stored
/// values.
async fn upsert_cv_data(
    db: &sqlx::SqlitePool,
    user_id: &str,
    structured: Option<&str>,
    raw_text: Option<&str>,
) -> Result<(), ApiError> {
    let id = generate_cv_data_id();

    sqlx::query(
        r#"
        INSERT INTO cv_data (id, user_id, structured, raw_text, updated_at)
        VALUES (?, ?, ?, ?, datetime('now'))
        ON CONFLICT(user_id) DO UPDATE SET
            structured = COALESCE(excluded.structured, structured),
            raw_text = COALESCE(excluded.raw_text, raw_text),
            updated_at = datetime('now')
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(structured)
    .bind(raw_text)
    .execute(db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(())
}
