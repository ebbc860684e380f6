// src/jobs/validators.rs

use super::models::{CreateJobRequest, UpdateJobRequest};
use crate::common::{ValidationResult, Validator};
use std::collections::HashSet;

// ============================================================================
// Job Validators
// ============================================================================

pub struct JobValidator;

fn valid_statuses() -> HashSet<&'static str> {
    HashSet::from([
        "saved",
        "applied",
        "interview",
        "offer",
        "rejected",
        "withdrawn",
    ])
}

impl Validator<CreateJobRequest> for JobValidator {
    fn validate(&self, data: &CreateJobRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() {
            result.add_error("title", "Job title is required");
        } else if data.title.len() > 255 {
            result.add_error("title", "Job title must be less than 255 characters");
        }

        if let Some(company) = &data.company {
            if company.len() > 255 {
                result.add_error("company", "Company name must be less than 255 characters");
            }
        }

        if let Some(location) = &data.location {
            if location.len() > 255 {
                result.add_error("location", "Location must be less than 255 characters");
            }
        }

        if let Some(posting) = &data.posting {
            if posting.len() > 50_000 {
                result.add_error("posting", "Posting text must be less than 50000 characters");
            }
        }

        if let Some(url) = &data.url {
            if !url.trim().is_empty() && !url.starts_with("http://") && !url.starts_with("https://")
            {
                result.add_error("url", "URL must start with http:// or https://");
            }
        }

        result
    }
}

impl Validator<UpdateJobRequest> for JobValidator {
    fn validate(&self, data: &UpdateJobRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Check if at least one field is provided
        if data.title.is_none()
            && data.company.is_none()
            && data.location.is_none()
            && data.posting.is_none()
            && data.url.is_none()
            && data.status.is_none()
        {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                result.add_error("title", "Job title cannot be empty");
            } else if title.len() > 255 {
                result.add_error("title", "Job title must be less than 255 characters");
            }
        }

        if let Some(status) = &data.status {
            if !valid_statuses().contains(status.as_str()) {
                result.add_error("status", "Invalid job status");
            }
        }

        if let Some(posting) = &data.posting {
            if posting.len() > 50_000 {
                result.add_error("posting", "Posting text must be less than 50000 characters");
            }
        }

        if let Some(url) = &data.url {
            if !url.trim().is_empty() && !url.starts_with("http://") && !url.starts_with("https://")
            {
                result.add_error("url", "URL must start with http:// or https://");
            }
        }

        result
    }
}
