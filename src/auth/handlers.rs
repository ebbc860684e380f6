//! Authentication handlers

use axum::extract::{Extension, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::extractors::AuthedUser;
use super::models::{Claims, GoogleIdTokenPayload, User};
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState};

/// Issue a JWT session token for the given user id
fn issue_session_token(user_id: &str, jwt_secret: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::days(30)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign session token");
        ApiError::InternalServer("failed to issue token".to_string())
    })
}

/// POST /api/auth/google
/// Authenticates a user via Google OAuth ID token
///
/// # Request Body
/// ```json
/// {
///   "id_token": "<google id token>"
/// }
/// ```
///
/// # Response
/// ```json
/// {
///   "token": "<jwt token>",
///   "user": { ... }
/// }
/// ```
pub async fn google_auth(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<GoogleIdTokenPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("🔐 Received Google auth request");
    let state = state_lock.read().await.clone();

    // Verify token with Google's tokeninfo endpoint
    // Docs: https://developers.google.com/identity/sign-in/web/backend-auth
    let tokeninfo_url = format!(
        "https://oauth2.googleapis.com/tokeninfo?id_token={}",
        payload.id_token
    );

    debug!("Initiating Google token validation with tokeninfo endpoint");

    let resp = state.http.get(&tokeninfo_url).send().await;
    let body = match resp {
        Ok(r) => {
            let status = r.status();
            if status.is_success() {
                r.json::<serde_json::Value>().await.map_err(|e| {
                    error!(error = %e, "Failed to parse Google tokeninfo JSON response");
                    ApiError::BadRequest("malformed id_token".to_string())
                })?
            } else {
                warn!(http_status = %status, "Google tokeninfo returned error status");
                return Err(ApiError::Unauthorized(
                    "id_token validation failed".to_string(),
                ));
            }
        }
        Err(e) => {
            error!(
                error = %e,
                endpoint = "https://oauth2.googleapis.com/tokeninfo",
                "HTTP error contacting Google tokeninfo endpoint"
            );
            return Err(ApiError::InternalServer(
                "google token validation service unavailable".to_string(),
            ));
        }
    };

    // Extract required fields: email, sub
    let email = body
        .get("email")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let sub = body.get("sub").and_then(|v| v.as_str()).map(str::to_string);
    let name = body
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let picture = body
        .get("picture")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let (email, sub) = match (email, sub) {
        (Some(e), Some(s)) => (e, s),
        _ => {
            warn!("Google token missing required fields (email/sub)");
            return Err(ApiError::BadRequest(
                "token missing required fields".to_string(),
            ));
        }
    };

    // Check token expiration
    if let Some(exp) = body.get("exp").and_then(|v| v.as_i64()) {
        if exp < Utc::now().timestamp() {
            warn!(token_exp = exp, "Google token has expired");
            return Err(ApiError::Unauthorized("token has expired".to_string()));
        }
    }

    // Validate audience (client id) when configured
    if let Some(client_id) = &state.google_client_id {
        match body.get("aud").and_then(|v| v.as_str()) {
            Some(aud_val) if aud_val == client_id => {
                debug!("Google token audience validation successful");
            }
            Some(aud_val) => {
                warn!(
                    token_audience = %aud_val,
                    "Google token audience validation failed - rejecting token"
                );
                return Err(ApiError::Unauthorized(
                    "token audience mismatch".to_string(),
                ));
            }
            None => {
                warn!("Google token missing audience field - rejecting token");
                return Err(ApiError::Unauthorized("token missing audience".to_string()));
            }
        }
    }

    debug!(
        email = %safe_email_log(&email),
        provider = "google",
        "Google token validation successful, proceeding with user lookup"
    );

    // Create or find user in DB
    let existing: Option<User> =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE provider = ? AND provider_id = ?")
            .bind("google")
            .bind(&sub)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    let user = match existing {
        Some(u) => u,
        None => {
            let user_id = generate_user_id();
            let now = Utc::now().to_rfc3339();

            sqlx::query(
                r#"
                INSERT INTO users (id, email, name, avatar, provider, provider_id, created_at)
                VALUES (?, ?, ?, ?, 'google', ?, ?)
                "#,
            )
            .bind(&user_id)
            .bind(&email)
            .bind(&name)
            .bind(&picture)
            .bind(&sub)
            .bind(&now)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            info!(
                user_id = %user_id,
                email = %safe_email_log(&email),
                "Created new user from Google sign-in"
            );

            User {
                id: user_id,
                email: email.clone(),
                name,
                avatar: picture,
                provider: Some("google".to_string()),
                provider_id: Some(sub),
                created_at: Some(now),
            }
        }
    };

    let token = issue_session_token(&user.id, &state.jwt_secret)?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user,
    })))
}

/// GET /api/me - Get current user information
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await;

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    match user {
        Some(u) => Ok(Json(serde_json::json!({ "user": u }))),
        None if state.dev_mode.is_enabled() => {
            // Dev user is synthesized, not persisted
            Ok(Json(
                serde_json::json!({ "user": state.dev_mode.create_dev_user() }),
            ))
        }
        None => Err(ApiError::NotFound("user not found".to_string())),
    }
}

/// POST /api/auth/logout - Logout (client-side token removal)
pub async fn logout_handler(_authed: AuthedUser) -> Result<Json<serde_json::Value>, ApiError> {
    // JWTs are stateless; the client discards the token
    Ok(Json(serde_json::json!({ "message": "logged out" })))
}
