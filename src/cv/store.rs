// src/cv/store.rs
//! Repository interfaces for the resolution pipeline.
//!
//! The pipeline itself performs no I/O: it reads through these synchronous
//! store traits, so it can run against in-memory fakes in tests. The HTTP
//! layer preloads the relevant rows into a `CvDataSnapshot` before invoking
//! the coordinator.

use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

use super::models::{EditorDocument, RawCvData, UserProfile};
use crate::profile::models::Profile;

/// The slice of a job record the pipeline needs.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
}

pub trait JobStore {
    fn get(&self, job_id: &str) -> Option<JobSummary>;
}

pub trait DocumentStore {
    fn get(&self, job_id: &str) -> Option<EditorDocument>;
}

pub trait RawCvStore {
    fn get(&self, user_id: &str) -> Option<RawCvData>;
}

pub trait ProfileStore {
    fn get(&self, user_id: &str) -> Option<UserProfile>;
}

/// The stores a resolution reads from, injected as trait objects.
pub struct Stores<'a> {
    pub jobs: &'a dyn JobStore,
    pub documents: &'a dyn DocumentStore,
    pub raw_cv: &'a dyn RawCvStore,
    pub profiles: &'a dyn ProfileStore,
}

// ============================================================================
// Snapshot-backed stores
// ============================================================================

/// Point-in-time view of the rows one resolution reads, loaded for a single
/// (user, job) pair. Concurrent writers are not guarded against; each
/// resolution sees whatever was stored at load time.
#[derive(Debug, Default)]
pub struct CvDataSnapshot {
    pub user_id: String,
    pub job_id: String,
    pub job: Option<JobSummary>,
    pub document: Option<EditorDocument>,
    pub raw_cv: Option<RawCvData>,
    pub profile: Option<UserProfile>,
}

impl CvDataSnapshot {
    pub fn stores(&self) -> Stores<'_> {
        Stores {
            jobs: self,
            documents: self,
            raw_cv: self,
            profiles: self,
        }
    }
}

impl JobStore for CvDataSnapshot {
    fn get(&self, job_id: &str) -> Option<JobSummary> {
        self.job.as_ref().filter(|job| job.id == job_id).cloned()
    }
}

impl DocumentStore for CvDataSnapshot {
    fn get(&self, job_id: &str) -> Option<EditorDocument> {
        if job_id == self.job_id {
            self.document.clone()
        } else {
            None
        }
    }
}

impl RawCvStore for CvDataSnapshot {
    fn get(&self, user_id: &str) -> Option<RawCvData> {
        if user_id == self.user_id {
            self.raw_cv.clone()
        } else {
            None
        }
    }
}

impl ProfileStore for CvDataSnapshot {
    fn get(&self, user_id: &str) -> Option<UserProfile> {
        if user_id == self.user_id {
            self.profile.clone()
        } else {
            None
        }
    }
}

// ============================================================================
// SQLite loader
// ============================================================================

/// Load everything one resolution can touch for the given user and job.
/// Stored blobs that fail to parse are treated as absent, not as errors; the
/// emptiness rules downstream decide what that means.
pub async fn load_snapshot(
    db: &SqlitePool,
    user_id: &str,
    job_id: &str,
) -> Result<CvDataSnapshot, sqlx::Error> {
    let job: Option<(String, String)> =
        sqlx::query_as("SELECT id, title FROM jobs WHERE id = ? AND user_id = ?")
            .bind(job_id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    let document_row: Option<(String,)> =
        sqlx::query_as("SELECT content FROM cv_documents WHERE job_id = ? AND user_id = ?")
            .bind(job_id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    let document = document_row.and_then(|(content,)| {
        match serde_json::from_str::<EditorDocument>(&content) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(error = %e, job_id = %job_id, "Stored CV document is not valid JSON; treating as absent");
                None
            }
        }
    });

    let raw_row: Option<(Option<String>, Option<String>)> =
        sqlx::query_as("SELECT structured, raw_text FROM cv_data WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    let raw_cv = raw_row.map(|(structured, raw_text)| RawCvData {
        structured: structured.and_then(|s| match serde_json::from_str::<Value>(&s) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Stored structured CV data is not valid JSON; treating as absent");
                None
            }
        }),
        raw_text,
    });

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .map(|p| p.to_user_profile());

    Ok(CvDataSnapshot {
        user_id: user_id.to_string(),
        job_id: job_id.to_string(),
        job: job.map(|(id, title)| JobSummary { id, title }),
        document,
        raw_cv,
        profile,
    })
}
