//! Tests for auth module
//!
//! These tests verify JWT claims round-tripping and the user model shape.

#[cfg(test)]
mod tests {
    use super::super::models::{Claims, User};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

    #[test]
    fn test_claims_roundtrip() {
        let secret = "test-secret";
        let claims = Claims {
            sub: "U_K7NP3X".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding claims should succeed");

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("decoding a freshly issued token should succeed");

        assert_eq!(decoded.claims.sub, "U_K7NP3X");
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = "test-secret";
        let claims = Claims {
            sub: "U_K7NP3X".to_string(),
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding claims should succeed");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err(), "Expired token should be rejected");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims {
            sub: "U_K7NP3X".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret-a"),
        )
        .expect("encoding claims should succeed");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err(), "Token signed with another secret should be rejected");
    }

    #[test]
    fn test_user_serializes_with_optional_fields() {
        let user = User {
            id: "U_K7NP3X".to_string(),
            email: "user@example.com".to_string(),
            name: None,
            avatar: None,
            provider: Some("google".to_string()),
            provider_id: Some("1234567890".to_string()),
            created_at: None,
        };

        let json = serde_json::to_value(&user).expect("user should serialize");
        assert_eq!(json["id"], "U_K7NP3X");
        assert_eq!(json["email"], "user@example.com");
        assert!(json["name"].is_null());
    }
}
