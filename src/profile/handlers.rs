// src/profile/handlers.rs

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::models::{Profile, UpdateProfileRequest};
use super::validators::ProfileValidator;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, Validator};

/// GET /api/profile - Get user profile
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({ "profile": profile })))
}

/// PUT /api/profile - Update user profile
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await;

    info!(user_id = %authed.id, "Profile update request received");

    let validation = ProfileValidator.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    // Update or insert profile; absent fields keep their stored values
    sqlx::query(
        r#"
        INSERT INTO profiles (
            user_id, name, email, phone, linkedin, portfolio,
            location, city, country, title, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
        ON CONFLICT(user_id) DO UPDATE SET
            name = COALESCE(excluded.name, name),
            email = COALESCE(excluded.email, email),
            phone = COALESCE(excluded.phone, phone),
            linkedin = COALESCE(excluded.linkedin, linkedin),
            portfolio = COALESCE(excluded.portfolio, portfolio),
            location = COALESCE(excluded.location, location),
            city = COALESCE(excluded.city, city),
            country = COALESCE(excluded.country, country),
            title = COALESCE(excluded.title, title),
            updated_at = datetime('now')
        "#,
    )
    .bind(&authed.id)
    .bind(request.name.as_deref())
    .bind(request.email.as_deref())
    .bind(request.phone.as_deref())
    .bind(request.linkedin.as_deref())
    .bind(request.portfolio.as_deref())
    .bind(request.location.as_deref())
    .bind(request.city.as_deref())
    .bind(request.country.as_deref())
    .bind(request.title.as_deref())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %authed.id,
            "Database error updating profile"
        );
        ApiError::DatabaseError(e)
    })?;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, "Profile updated");

    Ok(Json(profile))
}
