//! Tests for jobs module
//!
//! These tests verify the job model structure and the create/update
//! validators.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    fn create_request(title: &str) -> models::CreateJobRequest {
        models::CreateJobRequest {
            title: title.to_string(),
            company: Some("Acme ApS".to_string()),
            location: Some("København".to_string()),
            posting: Some("Vi søger en udvikler...".to_string()),
            url: Some("https://example.com/job/123".to_string()),
        }
    }

    // ============================================================================
    // Validator Tests
    // ============================================================================

    #[test]
    fn test_create_job_valid_data() {
        let result = validators::JobValidator.validate(&create_request("Softwareudvikler"));
        assert!(result.is_valid, "Valid job data should pass validation");
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_create_job_missing_title() {
        let result = validators::JobValidator.validate(&create_request("   "));
        assert!(!result.is_valid, "Blank title should fail validation");
        assert!(result.errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn test_create_job_rejects_bad_url() {
        let mut request = create_request("Softwareudvikler");
        request.url = Some("example.com/job".to_string());

        let result = validators::JobValidator.validate(&request);
        assert!(!result.is_valid, "URL without scheme should fail validation");
        assert!(result.errors.iter().any(|e| e.field == "url"));
    }

    #[test]
    fn test_update_job_requires_at_least_one_field() {
        let request = models::UpdateJobRequest {
            title: None,
            company: None,
            location: None,
            posting: None,
            url: None,
            status: None,
        };

        let result = validators::JobValidator.validate(&request);
        assert!(!result.is_valid, "Update with no fields should fail validation");
        assert!(result.errors.iter().any(|e| e.field == "general"));
    }

    #[test]
    fn test_update_job_rejects_unknown_status() {
        let request = models::UpdateJobRequest {
            title: None,
            company: None,
            location: None,
            posting: None,
            url: None,
            status: Some("ghosted".to_string()),
        };

        let result = validators::JobValidator.validate(&request);
        assert!(!result.is_valid, "Unknown status should fail validation");
        assert!(result.errors.iter().any(|e| e.field == "status"));
    }

    #[test]
    fn test_update_job_accepts_known_status() {
        let request = models::UpdateJobRequest {
            title: None,
            company: None,
            location: None,
            posting: None,
            url: None,
            status: Some("applied".to_string()),
        };

        let result = validators::JobValidator.validate(&request);
        assert!(result.is_valid, "Known status should pass validation");
    }
}
