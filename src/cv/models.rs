// src/cv/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Editor Document Models
// ============================================================================

/// The per-job CV built in the two-column editor. Every field is typed and
/// present (possibly empty); the frontend serializes it in camelCase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorDocument {
    pub left_column: LeftColumn,
    pub right_column: RightColumn,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeftColumn {
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RightColumn {
    pub professional_intro: String,
    pub experience: Vec<ExperienceEntry>,
}

/// One work-experience entry. Entries are rendered in the order supplied;
/// upstream keeps them newest-first and this pipeline does not re-sort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub key_milestones: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub period: Option<String>,
}

impl EditorDocument {
    /// A document counts as empty when it has no experience entry with a
    /// non-empty title or company and no professional intro. Empty documents
    /// are skipped in favor of the next candidate source.
    pub fn is_empty(&self) -> bool {
        let has_experience = self
            .right_column
            .experience
            .iter()
            .any(|e| !e.title.trim().is_empty() || !e.company.trim().is_empty());
        let has_intro = !self.right_column.professional_intro.trim().is_empty();

        !has_experience && !has_intro
    }
}

// ============================================================================
// Raw CV Data Models
// ============================================================================

/// The shared raw CV blob: the AI-extracted structured record (shape varies
/// by extraction run, so it stays a loose JSON value) and/or the uploaded
/// plain text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCvData {
    pub structured: Option<Value>,
    pub raw_text: Option<String>,
}

// ============================================================================
// Resolution Models
// ============================================================================

/// Contact profile value object consumed by both formatters. Loaded once per
/// resolution and passed by value; the pipeline never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub title: Option<String>,
}

/// The one CV representation selected for a resolution. Exactly one variant
/// is resolved per invocation.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    EditorDocument(EditorDocument),
    StructuredExtraction(Value),
    RawText(String),
}

/// Output of a resolution: canonical text plus the contact profile and the
/// job's title. Immutable once produced; lives only for the duration of a
/// single request.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCv {
    pub text: String,
    pub profile: UserProfile,
    #[serde(rename = "jobTitle")]
    pub job_title: String,
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCvDataRequest {
    pub structured: Option<Value>,
    pub raw_text: Option<String>,
}
