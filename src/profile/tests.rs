//! Tests for profile module
//!
//! These tests verify the profile model projection used by the CV pipeline
//! and the profile update validator.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    fn empty_update() -> models::UpdateProfileRequest {
        models::UpdateProfileRequest {
            name: None,
            email: None,
            phone: None,
            linkedin: None,
            portfolio: None,
            location: None,
            city: None,
            country: None,
            title: None,
        }
    }

    // ============================================================================
    // Model Tests
    // ============================================================================

    #[test]
    fn test_profile_projects_to_user_profile() {
        let profile = models::Profile {
            user_id: "U_K7NP3X".to_string(),
            name: Some("Mette Hansen".to_string()),
            email: Some("mette@example.com".to_string()),
            phone: Some("+45 12 34 56 78".to_string()),
            linkedin: Some("https://linkedin.com/in/mette".to_string()),
            portfolio: None,
            location: None,
            city: Some("Aarhus".to_string()),
            country: Some("Danmark".to_string()),
            title: Some("Softwareudvikler".to_string()),
            updated_at: None,
        };

        let user_profile = profile.to_user_profile();
        assert_eq!(user_profile.name.as_deref(), Some("Mette Hansen"));
        assert_eq!(user_profile.city.as_deref(), Some("Aarhus"));
        assert!(user_profile.portfolio.is_none());
    }

    // ============================================================================
    // Validator Tests
    // ============================================================================

    #[test]
    fn test_validator_rejects_empty_update() {
        let result = validators::ProfileValidator.validate(&empty_update());

        assert!(!result.is_valid, "Update with no fields should fail validation");
        assert!(result.errors.iter().any(|e| e.field == "general"));
    }

    #[test]
    fn test_validator_accepts_partial_update() {
        let mut request = empty_update();
        request.name = Some("Mette Hansen".to_string());

        let result = validators::ProfileValidator.validate(&request);
        assert!(result.is_valid, "Partial update with valid data should pass");
    }

    #[test]
    fn test_validator_rejects_bad_email() {
        let mut request = empty_update();
        request.email = Some("not-an-email".to_string());

        let result = validators::ProfileValidator.validate(&request);
        assert!(!result.is_valid, "Malformed email should fail validation");
        assert!(result.errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn test_validator_rejects_bad_linkedin_url() {
        let mut request = empty_update();
        request.linkedin = Some("linkedin.com/in/mette".to_string());

        let result = validators::ProfileValidator.validate(&request);
        assert!(!result.is_valid, "URL without scheme should fail validation");
        assert!(result.errors.iter().any(|e| e.field == "linkedin"));
    }
}
