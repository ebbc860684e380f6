// src/cv/resolve.rs
//! The resolution coordinator.
//!
//! For a given job, picks the one CV representation to format, in fixed
//! precedence: the per-job editor document, then the structured extraction,
//! then the uploaded raw text. A single synchronous pass over injected
//! stores; no retries, since the inputs are local reads — absence means the
//! user has not produced the data yet, not that something transient failed.

use tracing::debug;

use super::format::{extraction_is_empty, format_document, format_extraction};
use super::models::{CandidateSource, EditorDocument, RawCvData, ResolvedCv};
use super::store::Stores;
use crate::common::ApiError;

/// Raw text below this many trimmed characters is not usable CV data, and no
/// resolution may return a shorter canonical text.
pub const MIN_CV_TEXT_LEN: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("no usable CV data")]
    NoCvData,
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::JobNotFound(job_id) => {
                ApiError::NotFound(format!("job not found: {}", job_id))
            }
            ResolveError::NoCvData => ApiError::NoCvData(
                "No CV data available. Upload a CV or fill in the CV editor first.".to_string(),
            ),
        }
    }
}

/// Resolve one canonical CV text for the given job.
///
/// 1. Load the job record; absent means `JobNotFound`.
/// 2. Try the per-job editor document.
/// 3. Try the shared raw CV blob: structured extraction, then raw text.
/// 4. Nothing usable: `NoCvData`.
/// 5. Assemble text, profile and job title into a `ResolvedCv`.
pub fn resolve_cv(stores: &Stores<'_>, user_id: &str, job_id: &str) -> Result<ResolvedCv, ResolveError> {
    let job = stores
        .jobs
        .get(job_id)
        .ok_or_else(|| ResolveError::JobNotFound(job_id.to_string()))?;

    let profile = stores.profiles.get(user_id).unwrap_or_default();

    let candidate = select_candidate(stores.documents.get(job_id), stores.raw_cv.get(user_id))
        .ok_or(ResolveError::NoCvData)?;

    debug!(
        job_id = %job_id,
        source = candidate_name(&candidate),
        "Selected CV candidate source"
    );

    let text = match &candidate {
        CandidateSource::EditorDocument(document) => format_document(document, &profile),
        CandidateSource::StructuredExtraction(record) => format_extraction(record, &profile),
        CandidateSource::RawText(text) => text.clone(),
    };

    // Backstop for the emptiness invariant: a candidate that passed selection
    // but still formats below the threshold is no CV at all.
    if text.trim().chars().count() < MIN_CV_TEXT_LEN {
        return Err(ResolveError::NoCvData);
    }

    Ok(ResolvedCv {
        text,
        profile,
        job_title: job.title,
    })
}

/// The fixed-precedence candidate chain. Each entry is gated by its own
/// emptiness rule; the first usable candidate wins.
fn select_candidate(
    document: Option<EditorDocument>,
    raw: Option<RawCvData>,
) -> Option<CandidateSource> {
    let (structured, raw_text) = match raw {
        Some(data) => (data.structured, data.raw_text),
        None => (None, None),
    };

    let candidates = [
        document
            .filter(|doc| !doc.is_empty())
            .map(CandidateSource::EditorDocument),
        structured
            .filter(|record| !extraction_is_empty(record))
            .map(CandidateSource::StructuredExtraction),
        raw_text
            .filter(|text| text.trim().chars().count() >= MIN_CV_TEXT_LEN)
            .map(CandidateSource::RawText),
    ];

    candidates.into_iter().flatten().next()
}

fn candidate_name(candidate: &CandidateSource) -> &'static str {
    match candidate {
        CandidateSource::EditorDocument(_) => "editor_document",
        CandidateSource::StructuredExtraction(_) => "structured_extraction",
        CandidateSource::RawText(_) => "raw_text",
    }
}
