// src/profile/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::cv::models::UserProfile;

// ============================================================================
// Profile Models
// ============================================================================

/// Contact profile database model. One row per user; every field the CV
/// formatters can render is optional.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Profile {
    /// Project the stored row onto the value object the CV pipeline consumes.
    pub fn to_user_profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            linkedin: self.linkedin.clone(),
            portfolio: self.portfolio.clone(),
            location: self.location.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            title: self.title.clone(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub title: Option<String>,
}
