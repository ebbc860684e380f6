// src/cv/handlers/ai.rs
//! AI-request builders consuming the resolved CV.
//!
//! Both handlers embed `ResolvedCv.text` verbatim as a prompt variable; the
//! resolution errors (job not found, no CV data) surface to the caller
//! unchanged.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::cv::resolve::resolve_cv;
use crate::cv::store::load_snapshot;
use crate::jobs::models::Job;
use crate::services::openai::TextGenerationPurpose;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct GenerateRequest {
    pub additional_context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AIGenerationResponse {
    pub content: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AIGenerationMetadata>,
}

#[derive(Debug, Serialize)]
pub struct AIGenerationMetadata {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/jobs/:job_id/ai/cover-letter - Generate a cover letter
pub async fn generate_cover_letter(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<AIGenerationResponse>, ApiError> {
    let state = state_lock.read().await;

    info!(user_id = %authed.id, job_id = %job_id, "Generating cover letter with AI");

    let (resolved, job) = resolve_for_job(&state, &authed.id, &job_id).await?;

    let prompt = format!(
        "Skriv en kortfattet, professionel ansøgning på dansk til stillingen nedenfor.\n\n\
        STILLING: {}\n\
        VIRKSOMHED: {}\n\n\
        JOBOPSLAG:\n{}\n\n\
        KANDIDATENS CV:\n{}\n\n\
        REGLER:\n\
        - Brug kun erfaring der faktisk står i CV'et\n\
        - Ingen pladsholdere som [Navn] eller [Virksomhed]\n\
        - Maks 300 ord\n\
        {}",
        job.title,
        job.company.as_deref().unwrap_or(""),
        job.posting.as_deref().unwrap_or(""),
        resolved.text,
        req.additional_context.as_deref().unwrap_or("")
    );

    let result = state
        .openai_service
        .generate_text(TextGenerationPurpose::CoverLetter, &prompt, None)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to generate cover letter");
            ApiError::ServiceUnavailable(format!("AI service error: {}", e))
        })?;

    let model = state
        .openai_service
        .get_config()
        .await
        .map(|c| c.models.generation)
        .unwrap_or_else(|_| "gpt-5".to_string());

    Ok(Json(AIGenerationResponse {
        content: serde_json::json!(result),
        metadata: Some(AIGenerationMetadata {
            model,
            tokens_used: None,
        }),
    }))
}

/// POST /api/jobs/:job_id/ai/interview-prep - Generate interview preparation
pub async fn generate_interview_prep(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<AIGenerationResponse>, ApiError> {
    let state = state_lock.read().await;

    info!(user_id = %authed.id, job_id = %job_id, "Generating interview prep with AI");

    let (resolved, job) = resolve_for_job(&state, &authed.id, &job_id).await?;

    let prompt = format!(
        "Lav en interviewforberedelse på dansk til stillingen nedenfor: \
        10 sandsynlige spørgsmål med forslag til svar baseret på kandidatens CV, \
        plus 3 gode spørgsmål kandidaten selv kan stille.\n\n\
        STILLING: {}\n\
        VIRKSOMHED: {}\n\n\
        JOBOPSLAG:\n{}\n\n\
        KANDIDATENS CV:\n{}\n\n\
        {}",
        job.title,
        job.company.as_deref().unwrap_or(""),
        job.posting.as_deref().unwrap_or(""),
        resolved.text,
        req.additional_context.as_deref().unwrap_or("")
    );

    let result = state
        .openai_service
        .generate_text(TextGenerationPurpose::InterviewPrep, &prompt, None)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to generate interview prep");
            ApiError::ServiceUnavailable(format!("AI service error: {}", e))
        })?;

    let model = state
        .openai_service
        .get_config()
        .await
        .map(|c| c.models.generation)
        .unwrap_or_else(|_| "gpt-5".to_string());

    Ok(Json(AIGenerationResponse {
        content: serde_json::json!(result),
        metadata: Some(AIGenerationMetadata {
            model,
            tokens_used: None,
        }),
    }))
}

/// Resolve the CV and load the full job row for prompt building.
async fn resolve_for_job(
    state: &AppState,
    user_id: &str,
    job_id: &str,
) -> Result<(crate::cv::models::ResolvedCv, Job), ApiError> {
    let snapshot = load_snapshot(&state.db, user_id, job_id)
        .await
        .map_err(ApiError::DatabaseError)?;

    let resolved = resolve_cv(&snapshot.stores(), user_id, job_id)?;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ? AND user_id = ?")
        .bind(job_id)
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("job not found".to_string()))?;

    Ok((resolved, job))
}
