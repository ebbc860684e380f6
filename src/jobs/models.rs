// src/jobs/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Job Models
// ============================================================================

/// A job posting the user is tracking. The posting text is kept verbatim so
/// AI-request builders can quote it alongside the resolved CV.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Job {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub posting: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub posting: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub posting: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: usize,
}
