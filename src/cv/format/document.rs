// src/cv/format/document.rs
//! Formats the strongly-typed editor document into canonical CV text.

use super::{
    compose, list_line, render_education_entry, render_experience_entry, SECTION_EDUCATION,
    SECTION_EXPERIENCE, SECTION_LANGUAGES, SECTION_PROFILE, SECTION_SKILLS,
};
use crate::cv::models::{EditorDocument, UserProfile};

/// Produce canonical text from an `EditorDocument`.
///
/// Pure function of its inputs: never fails, empty sub-collections simply
/// omit their section. Experience entries render in the order supplied.
pub fn format_document(document: &EditorDocument, profile: &UserProfile) -> String {
    let intro = document.right_column.professional_intro.trim().to_string();

    let experience = document
        .right_column
        .experience
        .iter()
        .map(|entry| {
            render_experience_entry(
                &entry.title,
                &entry.company,
                entry.location.as_deref(),
                &entry.start_date,
                entry.end_date.as_deref(),
                entry.key_milestones.as_deref(),
                &entry.bullets,
            )
        })
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let education = document
        .left_column
        .education
        .iter()
        .map(|entry| render_education_entry(&entry.degree, &entry.institution, entry.period.as_deref()))
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let skills = list_line(&document.left_column.skills);
    let languages = list_line(&document.left_column.languages);

    compose(
        profile,
        &[
            (SECTION_PROFILE, intro),
            (SECTION_EXPERIENCE, experience),
            (SECTION_EDUCATION, education),
            (SECTION_SKILLS, skills),
            (SECTION_LANGUAGES, languages),
        ],
    )
}
