// src/cv/format/structured.rs
//! Formats the loosely-typed AI extraction record into canonical CV text.
//!
//! Upstream extraction runs are not guaranteed to use one fixed schema, so
//! every semantic field is resolved through an ordered list of synonym keys;
//! the first present, non-null value wins and absence is never an error.

use serde_json::Value;
use tracing::debug;

use super::{
    compose, render_education_entry, render_experience_entry, SECTION_EDUCATION,
    SECTION_EXPERIENCE, SECTION_LANGUAGES, SECTION_PROFILE, SECTION_SKILLS,
};
use crate::cv::models::UserProfile;

// ============================================================================
// Synonym Tables
// ============================================================================

const SUMMARY_KEYS: &[&str] = &[
    "summary",
    "professional_summary",
    "professionalSummary",
    "profile",
    "professional_profile",
    "intro",
];
const EXPERIENCE_KEYS: &[&str] = &["experience", "work_experience", "workExperience", "jobs"];
const TITLE_KEYS: &[&str] = &["title", "position", "role"];
const COMPANY_KEYS: &[&str] = &["company", "employer", "organization"];
const LOCATION_KEYS: &[&str] = &["location", "city"];
const START_DATE_KEYS: &[&str] = &["start_date", "startDate", "from", "start"];
const END_DATE_KEYS: &[&str] = &["end_date", "endDate", "to", "end"];
const MILESTONE_KEYS: &[&str] = &["key_milestones", "keyMilestones", "milestones", "achievements"];
const BULLET_KEYS: &[&str] = &["bullets", "responsibilities", "tasks", "highlights"];
const EDUCATION_KEYS: &[&str] = &["education", "educations", "uddannelse"];
const DEGREE_KEYS: &[&str] = &["degree", "title", "name"];
const INSTITUTION_KEYS: &[&str] = &["institution", "school", "university"];
const PERIOD_KEYS: &[&str] = &["period", "year", "dates"];
const SKILL_KEYS: &[&str] = &["skills", "competencies", "kompetencer"];
const LANGUAGE_KEYS: &[&str] = &["languages", "sprog"];

/// Item keys probed when a list entry is an object instead of a string.
const ITEM_TEXT_KEYS: &[&str] = &["content", "text", "name"];

// ============================================================================
// Formatter
// ============================================================================

/// Produce canonical text from a structured extraction record.
///
/// Total over any JSON value: unrecognized shapes read as "field absent" and
/// shorten the output instead of failing. A record with zero recognizable
/// fields yields a header-only string; the caller decides whether that
/// counts as empty.
pub fn format_extraction(record: &Value, profile: &UserProfile) -> String {
    let summary = probe_str(record, SUMMARY_KEYS).unwrap_or_default();

    let experience = probe_array(record, EXPERIENCE_KEYS)
        .map(|entries| {
            entries
                .iter()
                .map(render_extracted_experience)
                .filter(|rendered| !rendered.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default();

    let education = probe_array(record, EDUCATION_KEYS)
        .map(|entries| {
            entries
                .iter()
                .map(render_extracted_education)
                .filter(|rendered| !rendered.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default();

    let skills = probe_array(record, SKILL_KEYS)
        .map(|items| string_items(items).join(", "))
        .unwrap_or_default();

    let languages = probe_array(record, LANGUAGE_KEYS)
        .map(|items| string_items(items).join(", "))
        .unwrap_or_default();

    compose(
        profile,
        &[
            (SECTION_PROFILE, summary),
            (SECTION_EXPERIENCE, experience),
            (SECTION_EDUCATION, education),
            (SECTION_SKILLS, skills),
            (SECTION_LANGUAGES, languages),
        ],
    )
}

/// The emptiness rule for extraction records: empty when no experience entry
/// carries a non-empty title or company and no summary is present.
pub fn extraction_is_empty(record: &Value) -> bool {
    let has_summary = probe_str(record, SUMMARY_KEYS).is_some();

    let has_experience = probe_array(record, EXPERIENCE_KEYS)
        .map(|entries| {
            entries.iter().any(|entry| {
                probe_str(entry, TITLE_KEYS).is_some() || probe_str(entry, COMPANY_KEYS).is_some()
            })
        })
        .unwrap_or(false);

    !has_summary && !has_experience
}

fn render_extracted_experience(entry: &Value) -> String {
    let title = probe_str(entry, TITLE_KEYS).unwrap_or_default();
    let company = probe_str(entry, COMPANY_KEYS).unwrap_or_default();
    let location = probe_str(entry, LOCATION_KEYS);
    let start_date = probe_str(entry, START_DATE_KEYS).unwrap_or_default();
    let end_date = probe_str(entry, END_DATE_KEYS);
    let milestones = probe_str(entry, MILESTONE_KEYS);
    let bullets = probe(entry, BULLET_KEYS)
        .and_then(Value::as_array)
        .map(|items| string_items(items))
        .unwrap_or_default();

    render_experience_entry(
        &title,
        &company,
        location.as_deref(),
        &start_date,
        end_date.as_deref(),
        milestones.as_deref(),
        &bullets,
    )
}

fn render_extracted_education(entry: &Value) -> String {
    let degree = probe_str(entry, DEGREE_KEYS).unwrap_or_default();
    let institution = probe_str(entry, INSTITUTION_KEYS).unwrap_or_default();
    let period = probe_str(entry, PERIOD_KEYS);

    render_education_entry(&degree, &institution, period.as_deref())
}

// ============================================================================
// Probing Helpers
// ============================================================================

/// First present, non-null value among the synonym keys.
fn probe<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = record.as_object()?;
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// First synonym resolving to a non-blank string.
fn probe_str(record: &Value, keys: &[&str]) -> Option<String> {
    probe(record, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First synonym resolving to a non-empty array.
fn probe_array<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    probe(record, keys)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

/// Normalize list items to plain strings. Items may be strings or
/// `{content|text|name}` records; anything else is dropped (logged, since it
/// is ambiguous whether upstream meant to lose it).
fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| {
            let text = match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(_) => probe_str(item, ITEM_TEXT_KEYS),
                _ => None,
            };
            if text.is_none() {
                debug!(entry = %item, "Dropping list entry with unrecognized shape");
            }
            text
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
