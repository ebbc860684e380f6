//! Tests for the resolution coordinator
//!
//! The coordinator runs against in-memory store fakes: no database, no
//! network. Covers the fixed precedence, the emptiness threshold, and the
//! end-to-end scenarios.

use serde_json::json;
use std::collections::HashMap;

use crate::cv::format::SECTION_EXPERIENCE;
use crate::cv::models::{
    EditorDocument, ExperienceEntry, RawCvData, RightColumn, UserProfile,
};
use crate::cv::resolve::{resolve_cv, ResolveError, MIN_CV_TEXT_LEN};
use crate::cv::store::{
    DocumentStore, JobStore, JobSummary, ProfileStore, RawCvStore, Stores,
};

const USER: &str = "U_TEST01";
const JOB: &str = "J_TEST01";

// ============================================================================
// In-memory store fakes
// ============================================================================

#[derive(Default)]
struct MemoryStores {
    jobs: HashMap<String, JobSummary>,
    documents: HashMap<String, EditorDocument>,
    raw_cv: HashMap<String, RawCvData>,
    profiles: HashMap<String, UserProfile>,
}

impl MemoryStores {
    fn stores(&self) -> Stores<'_> {
        Stores {
            jobs: self,
            documents: self,
            raw_cv: self,
            profiles: self,
        }
    }

    fn with_job(mut self) -> Self {
        self.jobs.insert(
            JOB.to_string(),
            JobSummary {
                id: JOB.to_string(),
                title: "Softwareudvikler".to_string(),
            },
        );
        self
    }
}

impl JobStore for MemoryStores {
    fn get(&self, job_id: &str) -> Option<JobSummary> {
        self.jobs.get(job_id).cloned()
    }
}

impl DocumentStore for MemoryStores {
    fn get(&self, job_id: &str) -> Option<EditorDocument> {
        self.documents.get(job_id).cloned()
    }
}

impl RawCvStore for MemoryStores {
    fn get(&self, user_id: &str) -> Option<RawCvData> {
        self.raw_cv.get(user_id).cloned()
    }
}

impl ProfileStore for MemoryStores {
    fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.get(user_id).cloned()
    }
}

fn document_with_experience(title: &str) -> EditorDocument {
    EditorDocument {
        right_column: RightColumn {
            professional_intro: "Erfaren udvikler med fokus på backend og drift.".to_string(),
            experience: vec![ExperienceEntry {
                title: title.to_string(),
                company: "Acme".to_string(),
                start_date: "2020-01".to_string(),
                end_date: None,
                ..Default::default()
            }],
        },
        ..Default::default()
    }
}

fn structured_record() -> serde_json::Value {
    json!({
        "jobs": [{
            "position": "Udvikler",
            "employer": "Acme",
            "responsibilities": ["Bygget X", "Testet Y"],
        }]
    })
}

// ============================================================================
// Error conditions
// ============================================================================

#[test]
fn test_unknown_job_is_job_not_found() {
    let stores = MemoryStores::default();

    let result = resolve_cv(&stores.stores(), USER, JOB);
    assert!(
        matches!(result, Err(ResolveError::JobNotFound(ref id)) if id == JOB),
        "missing job row must terminate with JobNotFound"
    );
}

#[test]
fn test_no_data_at_all_is_no_cv_data() {
    // Scenario: job exists, no document blob, no raw CV blob
    let stores = MemoryStores::default().with_job();

    let result = resolve_cv(&stores.stores(), USER, JOB);
    assert!(matches!(result, Err(ResolveError::NoCvData)));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_editor_document_wins_over_structured_extraction() {
    let mut stores = MemoryStores::default().with_job();
    stores
        .documents
        .insert(JOB.to_string(), document_with_experience("Seniorudvikler"));
    stores.raw_cv.insert(
        USER.to_string(),
        RawCvData {
            structured: Some(structured_record()),
            raw_text: None,
        },
    );

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert!(
        resolved.text.contains("Seniorudvikler | Acme"),
        "editor document must take precedence:\n{}",
        resolved.text
    );
    assert!(
        !resolved.text.contains("• Bygget X"),
        "the structured extraction must be ignored when a document exists"
    );
}

#[test]
fn test_empty_document_falls_back_to_structured_extraction() {
    let mut stores = MemoryStores::default().with_job();
    // Present but empty per the emptiness rule
    stores
        .documents
        .insert(JOB.to_string(), EditorDocument::default());
    stores.raw_cv.insert(
        USER.to_string(),
        RawCvData {
            structured: Some(structured_record()),
            raw_text: None,
        },
    );

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert!(resolved.text.contains("Udvikler | Acme"));
}

#[test]
fn test_empty_structured_extraction_falls_back_to_raw_text() {
    let raw = "Mette Hansen, udvikler. Ti års erfaring med backend-systemer.".to_string();

    let mut stores = MemoryStores::default().with_job();
    stores.raw_cv.insert(
        USER.to_string(),
        RawCvData {
            structured: Some(json!({"skills": ["Rust"]})),
            raw_text: Some(raw.clone()),
        },
    );

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert_eq!(resolved.text, raw, "raw text must be used verbatim");
}

// ============================================================================
// Emptiness threshold
// ============================================================================

#[test]
fn test_raw_text_below_threshold_is_rejected() {
    let mut stores = MemoryStores::default().with_job();
    stores.raw_cv.insert(
        USER.to_string(),
        RawCvData {
            structured: None,
            raw_text: Some("x".repeat(MIN_CV_TEXT_LEN - 1)),
        },
    );

    let result = resolve_cv(&stores.stores(), USER, JOB);
    assert!(
        matches!(result, Err(ResolveError::NoCvData)),
        "49 characters is below the threshold"
    );
}

#[test]
fn test_raw_text_at_threshold_is_accepted_verbatim() {
    let raw = "x".repeat(MIN_CV_TEXT_LEN);

    let mut stores = MemoryStores::default().with_job();
    stores.raw_cv.insert(
        USER.to_string(),
        RawCvData {
            structured: None,
            raw_text: Some(raw.clone()),
        },
    );

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("50 characters is enough");
    assert_eq!(resolved.text, raw);
}

#[test]
fn test_threshold_uses_trimmed_length() {
    let padded = format!("   {}   ", "x".repeat(MIN_CV_TEXT_LEN - 1));

    let mut stores = MemoryStores::default().with_job();
    stores.raw_cv.insert(
        USER.to_string(),
        RawCvData {
            structured: None,
            raw_text: Some(padded),
        },
    );

    let result = resolve_cv(&stores.stores(), USER, JOB);
    assert!(
        matches!(result, Err(ResolveError::NoCvData)),
        "surrounding whitespace must not count toward the threshold"
    );
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_structured_extraction_end_to_end() {
    // Scenario: job exists, no document, raw blob holds a structured record
    let mut stores = MemoryStores::default().with_job();
    stores.raw_cv.insert(
        USER.to_string(),
        RawCvData {
            structured: Some(structured_record()),
            raw_text: None,
        },
    );

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert_eq!(resolved.job_title, "Softwareudvikler");
    assert!(resolved.text.contains(SECTION_EXPERIENCE));
    assert!(resolved.text.contains("Udvikler | Acme"));
    assert!(resolved.text.contains("• Bygget X"));
    assert!(resolved.text.contains("• Testet Y"));
}

#[test]
fn test_ongoing_position_end_to_end() {
    // Scenario: document entry with no end date renders Nutid
    let mut stores = MemoryStores::default().with_job();
    stores
        .documents
        .insert(JOB.to_string(), document_with_experience("Udvikler"));

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert!(
        resolved.text.contains("2020-01 - Nutid"),
        "date line must end in Nutid:\n{}",
        resolved.text
    );
}

#[test]
fn test_resolution_is_idempotent() {
    let mut stores = MemoryStores::default().with_job();
    stores
        .documents
        .insert(JOB.to_string(), document_with_experience("Udvikler"));
    stores.profiles.insert(
        USER.to_string(),
        UserProfile {
            name: Some("Mette Hansen".to_string()),
            email: Some("mette@example.com".to_string()),
            ..Default::default()
        },
    );

    let first = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");
    let second = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert_eq!(first.text, second.text, "same stores must resolve to identical text");
}

#[test]
fn test_missing_profile_resolves_with_empty_profile() {
    let mut stores = MemoryStores::default().with_job();
    stores
        .documents
        .insert(JOB.to_string(), document_with_experience("Udvikler"));

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert!(resolved.profile.name.is_none());
    assert!(resolved.text.contains("Udvikler | Acme"));
}

#[test]
fn test_profile_is_carried_into_result() {
    let mut stores = MemoryStores::default().with_job();
    stores
        .documents
        .insert(JOB.to_string(), document_with_experience("Udvikler"));
    stores.profiles.insert(
        USER.to_string(),
        UserProfile {
            name: Some("Mette Hansen".to_string()),
            ..Default::default()
        },
    );

    let resolved = resolve_cv(&stores.stores(), USER, JOB).expect("resolution should succeed");

    assert_eq!(resolved.profile.name.as_deref(), Some("Mette Hansen"));
    assert!(resolved.text.starts_with("Mette Hansen"));
}
