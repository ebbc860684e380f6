// src/cv/validators.rs

use super::models::{EditorDocument, UpdateCvDataRequest};
use crate::common::{ValidationResult, Validator};

// ============================================================================
// CV Document Validators
// ============================================================================

pub struct CvDocumentValidator;

impl Validator<EditorDocument> for CvDocumentValidator {
    fn validate(&self, data: &EditorDocument) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.right_column.experience.len() > 50 {
            result.add_error("experience", "Cannot store more than 50 experience entries");
        }

        for (index, entry) in data.right_column.experience.iter().enumerate() {
            if entry.title.len() > 255 {
                result.add_error(
                    &format!("experience[{}].title", index),
                    "Title must be less than 255 characters",
                );
            }
            if entry.company.len() > 255 {
                result.add_error(
                    &format!("experience[{}].company", index),
                    "Company must be less than 255 characters",
                );
            }
            if entry.bullets.len() > 30 {
                result.add_error(
                    &format!("experience[{}].bullets", index),
                    "Cannot store more than 30 bullets per entry",
                );
            }
        }

        if data.left_column.education.len() > 20 {
            result.add_error("education", "Cannot store more than 20 education entries");
        }

        if data.left_column.skills.len() > 100 {
            result.add_error("skills", "Cannot store more than 100 skills");
        }

        if data.left_column.languages.len() > 20 {
            result.add_error("languages", "Cannot store more than 20 languages");
        }

        result
    }
}

// ============================================================================
// Raw CV Data Validators
// ============================================================================

pub struct CvDataValidator;

impl Validator<UpdateCvDataRequest> for CvDataValidator {
    fn validate(&self, data: &UpdateCvDataRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.structured.is_none() && data.raw_text.is_none() {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(structured) = &data.structured {
            if !structured.is_object() {
                result.add_error("structured", "Structured CV data must be a JSON object");
            }
        }

        if let Some(raw_text) = &data.raw_text {
            if raw_text.len() > 100_000 {
                result.add_error("rawText", "Raw CV text must be less than 100000 characters");
            }
        }

        result
    }
}
