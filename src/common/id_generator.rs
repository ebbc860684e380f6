// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., J_K7NP3X for tracked jobs)

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Tracked job posting (J_)
    Job,
    /// User account (U_)
    User,
    /// Per-job CV editor document (D_)
    Document,
    /// Shared raw CV data blob (C_)
    CvData,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Job => "J",
            EntityPrefix::User => "U",
            EntityPrefix::Document => "D",
            EntityPrefix::CvData => "C",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// Returns a string in format "PREFIX_XXXXXX" (e.g., "J_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

// ============================================================================
// Convenience functions for each entity type
// ============================================================================

/// Generate a Job ID (J_XXXXXX)
pub fn generate_job_id() -> String {
    generate_id(EntityPrefix::Job)
}

/// Generate a User ID (U_XXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate a Document ID (D_XXXXXX)
pub fn generate_document_id() -> String {
    generate_id(EntityPrefix::Document)
}

/// Generate a CV data ID (C_XXXXXX)
pub fn generate_cv_data_id() -> String {
    generate_id(EntityPrefix::CvData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let job_id = generate_job_id();
        assert!(job_id.starts_with("J_"));
        assert_eq!(job_id.len(), 8); // "J_" + 6 chars

        let document_id = generate_document_id();
        assert!(document_id.starts_with("D_"));
        assert_eq!(document_id.len(), 8);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_job_id();
        let random_part = &id[2..]; // Skip "J_"

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }

        // Verify no ambiguous characters
        assert!(!random_part.contains('I'));
        assert!(!random_part.contains('L'));
        assert!(!random_part.contains('O'));
        assert!(!random_part.contains('U'));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = generate_job_id();
            assert!(ids.insert(id), "Duplicate ID generated");
        }
    }

    #[test]
    fn test_all_prefixes() {
        assert!(generate_job_id().starts_with("J_"));
        assert!(generate_user_id().starts_with("U_"));
        assert!(generate_document_id().starts_with("D_"));
        assert!(generate_cv_data_id().starts_with("C_"));
    }
}
