// src/profile/validators.rs

use super::models::UpdateProfileRequest;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Profile Validators
// ============================================================================

pub struct ProfileValidator;

impl Validator<UpdateProfileRequest> for ProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Check if at least one field is provided
        if data.name.is_none()
            && data.email.is_none()
            && data.phone.is_none()
            && data.linkedin.is_none()
            && data.portfolio.is_none()
            && data.location.is_none()
            && data.city.is_none()
            && data.country.is_none()
            && data.title.is_none()
        {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(name) = &data.name {
            if name.len() > 255 {
                result.add_error("name", "Name must be less than 255 characters");
            }
        }

        if let Some(email) = &data.email {
            if !email.trim().is_empty() && !is_plausible_email(email) {
                result.add_error("email", "Email must be a valid address");
            }
        }

        if let Some(phone) = &data.phone {
            if phone.len() > 50 {
                result.add_error("phone", "Phone must be less than 50 characters");
            }
        }

        for (field, value) in [("linkedin", &data.linkedin), ("portfolio", &data.portfolio)] {
            if let Some(url) = value {
                if !url.trim().is_empty() && !is_plausible_url(url) {
                    result.add_error(field, "Must be a valid http(s) URL");
                }
            }
        }

        for (field, value) in [
            ("location", &data.location),
            ("city", &data.city),
            ("country", &data.country),
            ("title", &data.title),
        ] {
            if let Some(text) = value {
                if text.len() > 255 {
                    result.add_error(field, "Must be less than 255 characters");
                }
            }
        }

        result
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_plausible_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    parts.len() == 2 && !parts[0].is_empty() && parts[1].contains('.')
}

fn is_plausible_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
