// src/cv/format/mod.rs
//! Canonical CV text formatting.
//!
//! Both formatters emit the same text shape: a name/title header, a contact
//! line, then the sections in fixed order — PROFESSIONEL PROFIL,
//! ERHVERVSERFARING, UDDANNELSE, KOMPETENCER, SPROG — separated by a
//! fixed-width divider rule. Downstream consumers cannot tell from the text
//! which source produced it.

pub mod document;
pub mod structured;

pub use document::format_document;
pub use structured::{extraction_is_empty, format_extraction};

use super::models::UserProfile;

pub const SECTION_PROFILE: &str = "PROFESSIONEL PROFIL";
pub const SECTION_EXPERIENCE: &str = "ERHVERVSERFARING";
pub const SECTION_EDUCATION: &str = "UDDANNELSE";
pub const SECTION_SKILLS: &str = "KOMPETENCER";
pub const SECTION_LANGUAGES: &str = "SPROG";

/// Rendered in place of an end date for ongoing positions.
pub const PRESENT_LABEL: &str = "Nutid";

const DIVIDER_WIDTH: usize = 50;

fn divider() -> String {
    "─".repeat(DIVIDER_WIDTH)
}

/// Assemble the canonical text: header block first, then every non-blank
/// section in the order given, with a divider rule between blocks.
pub(crate) fn compose(profile: &UserProfile, sections: &[(&str, String)]) -> String {
    let mut blocks: Vec<String> = vec![header_block(profile)];

    for (heading, body) in sections {
        let body = body.trim();
        if body.is_empty() {
            continue;
        }
        blocks.push(format!("{}\n\n{}", heading, body));
    }

    blocks.join(&format!("\n{}\n", divider()))
}

fn header_block(profile: &UserProfile) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(name) = non_blank(profile.name.as_deref()) {
        lines.push(name.to_string());
    }
    if let Some(title) = non_blank(profile.title.as_deref()) {
        lines.push(title.to_string());
    }

    let contact = contact_line(profile);
    if !contact.is_empty() {
        lines.push(contact);
    }

    lines.join("\n")
}

/// Contact parts joined with " | ": email, phone, location, linkedin,
/// portfolio. Location prefers the free-form field, else "city, country".
fn contact_line(profile: &UserProfile) -> String {
    let location = non_blank(profile.location.as_deref())
        .map(str::to_string)
        .or_else(|| {
            let parts: Vec<&str> = [profile.city.as_deref(), profile.country.as_deref()]
                .into_iter()
                .flatten()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        });

    let parts: Vec<String> = [
        non_blank(profile.email.as_deref()).map(str::to_string),
        non_blank(profile.phone.as_deref()).map(str::to_string),
        location,
        non_blank(profile.linkedin.as_deref()).map(str::to_string),
        non_blank(profile.portfolio.as_deref()).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();

    parts.join(" | ")
}

/// One experience entry: "title | company | location" heading, a date line
/// ending in the end date or "Nutid", an optional milestones paragraph, then
/// "• bullet" lines. Blank parts are omitted.
pub(crate) fn render_experience_entry(
    title: &str,
    company: &str,
    location: Option<&str>,
    start_date: &str,
    end_date: Option<&str>,
    key_milestones: Option<&str>,
    bullets: &[String],
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let heading: Vec<&str> = [Some(title), Some(company), location]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !heading.is_empty() {
        lines.push(heading.join(" | "));
    }

    let start_date = start_date.trim();
    if !start_date.is_empty() {
        let end = non_blank(end_date).unwrap_or(PRESENT_LABEL);
        lines.push(format!("{} - {}", start_date, end));
    }

    if let Some(milestones) = non_blank(key_milestones) {
        lines.push(milestones.to_string());
    }

    for bullet in bullets {
        let bullet = bullet.trim();
        if !bullet.is_empty() {
            lines.push(format!("• {}", bullet));
        }
    }

    lines.join("\n")
}

/// One education entry: "degree | institution" plus an optional period line.
pub(crate) fn render_education_entry(
    degree: &str,
    institution: &str,
    period: Option<&str>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let heading: Vec<&str> = [Some(degree), Some(institution)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !heading.is_empty() {
        lines.push(heading.join(" | "));
    }

    if let Some(period) = non_blank(period) {
        lines.push(period.to_string());
    }

    lines.join("\n")
}

/// Comma-joined list line for skills and languages.
pub(crate) fn list_line(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
