// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::common::dev_mode::DevModeConfig;
use crate::services::{OpenAIService, SettingsService};

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub jwt_secret: String,
    pub google_client_id: Option<String>,
    pub dev_mode: DevModeConfig,
    pub settings_service: Arc<SettingsService>,
    pub openai_service: Arc<OpenAIService>,
}
