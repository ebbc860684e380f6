//! Tests for the two canonical-text formatters
//!
//! Both formatters must emit the same section headings in the same fixed
//! order so downstream consumers cannot tell which source produced the text.

use serde_json::json;

use crate::cv::format::{
    format_document, format_extraction, SECTION_EDUCATION, SECTION_EXPERIENCE, SECTION_LANGUAGES,
    SECTION_PROFILE, SECTION_SKILLS,
};
use crate::cv::format::structured::extraction_is_empty;
use crate::cv::models::{
    EditorDocument, EducationEntry, ExperienceEntry, LeftColumn, RightColumn, UserProfile,
};

fn sample_profile() -> UserProfile {
    UserProfile {
        name: Some("Mette Hansen".to_string()),
        email: Some("mette@example.com".to_string()),
        phone: Some("+45 12 34 56 78".to_string()),
        linkedin: None,
        portfolio: None,
        location: None,
        city: Some("Aarhus".to_string()),
        country: Some("Danmark".to_string()),
        title: Some("Softwareudvikler".to_string()),
    }
}

fn sample_document() -> EditorDocument {
    EditorDocument {
        left_column: LeftColumn {
            education: vec![EducationEntry {
                degree: "Cand.it.".to_string(),
                institution: "Aarhus Universitet".to_string(),
                period: Some("2014-2016".to_string()),
            }],
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            languages: vec!["Dansk".to_string(), "Engelsk".to_string()],
        },
        right_column: RightColumn {
            professional_intro: "Erfaren udvikler med fokus på backend.".to_string(),
            experience: vec![ExperienceEntry {
                title: "Udvikler".to_string(),
                company: "Acme".to_string(),
                location: Some("København".to_string()),
                start_date: "2020-01".to_string(),
                end_date: Some("2023-06".to_string()),
                key_milestones: Some("Ledte migreringen til skyen.".to_string()),
                bullets: vec!["Bygget X".to_string(), "Testet Y".to_string()],
            }],
        },
    }
}

fn section_positions(text: &str) -> Vec<usize> {
    [
        SECTION_PROFILE,
        SECTION_EXPERIENCE,
        SECTION_EDUCATION,
        SECTION_SKILLS,
        SECTION_LANGUAGES,
    ]
    .iter()
    .filter_map(|heading| text.find(heading))
    .collect()
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_document_formatting_is_idempotent() {
    let document = sample_document();
    let profile = sample_profile();

    let first = format_document(&document, &profile);
    let second = format_document(&document, &profile);

    assert_eq!(first, second, "Formatting the same inputs twice must yield identical text");
}

#[test]
fn test_extraction_formatting_is_idempotent() {
    let record = json!({
        "summary": "Erfaren udvikler.",
        "experience": [{"title": "Udvikler", "company": "Acme"}],
    });
    let profile = sample_profile();

    let first = format_extraction(&record, &profile);
    let second = format_extraction(&record, &profile);

    assert_eq!(first, second, "Formatting the same inputs twice must yield identical text");
}

// ============================================================================
// Section order
// ============================================================================

#[test]
fn test_document_section_order() {
    let text = format_document(&sample_document(), &sample_profile());

    let positions = section_positions(&text);
    assert_eq!(positions.len(), 5, "All five sections should be present:\n{}", text);

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "Sections must appear in the fixed order");
}

#[test]
fn test_extraction_section_order() {
    let record = json!({
        "summary": "Erfaren udvikler.",
        "work_experience": [{"position": "Udvikler", "employer": "Acme"}],
        "education": [{"degree": "Cand.it.", "institution": "Aarhus Universitet"}],
        "skills": ["Rust"],
        "languages": ["Dansk"],
    });

    let text = format_extraction(&record, &sample_profile());

    let positions = section_positions(&text);
    assert_eq!(positions.len(), 5, "All five sections should be present:\n{}", text);

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "Sections must appear in the fixed order");
}

// ============================================================================
// Synonym equivalence
// ============================================================================

#[test]
fn test_experience_synonyms_produce_identical_text() {
    let entry = json!({"title": "Udvikler", "company": "Acme", "bullets": ["Bygget X"]});
    let profile = sample_profile();

    let via_experience = format_extraction(&json!({ "experience": [entry] }), &profile);
    let via_work_experience = format_extraction(&json!({ "work_experience": [entry] }), &profile);
    let via_jobs = format_extraction(&json!({ "jobs": [entry] }), &profile);

    assert_eq!(via_experience, via_work_experience);
    assert_eq!(via_experience, via_jobs);
}

#[test]
fn test_entry_field_synonyms() {
    let canonical = format_extraction(
        &json!({"experience": [{"title": "Udvikler", "company": "Acme"}]}),
        &sample_profile(),
    );
    let synonyms = format_extraction(
        &json!({"experience": [{"position": "Udvikler", "employer": "Acme"}]}),
        &sample_profile(),
    );

    assert_eq!(canonical, synonyms, "Entry-level synonym keys must render identically");
}

#[test]
fn test_null_synonym_falls_through_to_next_key() {
    let record = json!({"experience": null, "jobs": [{"title": "Udvikler", "company": "Acme"}]});

    let text = format_extraction(&record, &sample_profile());
    assert!(text.contains("Udvikler | Acme"), "null first synonym should not mask later ones:\n{}", text);
}

// ============================================================================
// Entry rendering
// ============================================================================

#[test]
fn test_extraction_renders_scenario_entry() {
    let record = json!({
        "jobs": [{
            "position": "Udvikler",
            "employer": "Acme",
            "responsibilities": ["Bygget X", "Testet Y"],
        }]
    });

    let text = format_extraction(&record, &sample_profile());

    assert!(text.contains(SECTION_EXPERIENCE));
    assert!(text.contains("Udvikler | Acme"), "missing entry heading:\n{}", text);
    assert!(text.contains("• Bygget X"));
    assert!(text.contains("• Testet Y"));
}

#[test]
fn test_document_missing_end_date_renders_nutid() {
    let mut document = sample_document();
    document.right_column.experience[0].end_date = None;

    let text = format_document(&document, &sample_profile());

    assert!(
        text.contains("2020-01 - Nutid"),
        "ongoing position should render Nutid:\n{}",
        text
    );
}

#[test]
fn test_bullets_accept_object_items() {
    let record = json!({
        "experience": [{
            "title": "Udvikler",
            "company": "Acme",
            "bullets": [
                {"content": "Bygget X"},
                {"text": "Testet Y"},
                "Driftet Z",
            ],
        }]
    });

    let text = format_extraction(&record, &sample_profile());

    assert!(text.contains("• Bygget X"));
    assert!(text.contains("• Testet Y"));
    assert!(text.contains("• Driftet Z"));
}

#[test]
fn test_malformed_bullets_are_dropped_not_fatal() {
    let record = json!({
        "experience": [{
            "title": "Udvikler",
            "company": "Acme",
            "bullets": [{"label": "no content key"}, 42, "Bygget X"],
        }]
    });

    let text = format_extraction(&record, &sample_profile());

    assert!(text.contains("• Bygget X"));
    assert_eq!(
        text.matches('•').count(),
        1,
        "unrecognized bullet shapes should be dropped:\n{}",
        text
    );
}

#[test]
fn test_unrecognized_record_yields_header_only() {
    let record = json!({"frobnicate": true});

    let text = format_extraction(&record, &sample_profile());

    assert!(text.contains("Mette Hansen"));
    assert!(!text.contains(SECTION_EXPERIENCE));
    assert!(!text.contains(SECTION_PROFILE));
}

#[test]
fn test_contact_line_composition() {
    let text = format_document(&sample_document(), &sample_profile());

    assert!(
        text.contains("mette@example.com | +45 12 34 56 78 | Aarhus, Danmark"),
        "contact line should join parts with ' | ':\n{}",
        text
    );
}

// ============================================================================
// Emptiness rules
// ============================================================================

#[test]
fn test_document_emptiness() {
    let empty = EditorDocument::default();
    assert!(empty.is_empty());

    let mut intro_only = EditorDocument::default();
    intro_only.right_column.professional_intro = "Erfaren udvikler.".to_string();
    assert!(!intro_only.is_empty());

    let mut blank_experience = EditorDocument::default();
    blank_experience.right_column.experience = vec![ExperienceEntry::default()];
    assert!(
        blank_experience.is_empty(),
        "entries without title or company do not count"
    );

    let mut with_title = EditorDocument::default();
    with_title.right_column.experience = vec![ExperienceEntry {
        title: "Udvikler".to_string(),
        ..Default::default()
    }];
    assert!(!with_title.is_empty());
}

#[test]
fn test_extraction_emptiness() {
    assert!(extraction_is_empty(&json!({})));
    assert!(extraction_is_empty(&json!("not an object")));
    assert!(extraction_is_empty(&json!({"skills": ["Rust"]})), "skills alone are not usable CV data");
    assert!(extraction_is_empty(&json!({"experience": [{"location": "Aarhus"}]})));

    assert!(!extraction_is_empty(&json!({"summary": "Erfaren udvikler."})));
    assert!(!extraction_is_empty(&json!({"jobs": [{"employer": "Acme"}]})));
}
