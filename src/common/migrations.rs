// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Only drop tables if RESET_DB environment variable is set to "true"
    // This prevents data loss on server restarts
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    } else {
        info!("ℹ️  Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_user_tables(pool).await?;
    create_job_tables(pool).await?;
    create_cv_tables(pool).await?;
    create_system_tables(pool).await?;
    create_indexes(pool).await?;

    // Initialize default settings from environment variables
    init_default_settings(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in [
        "cv_data",
        "cv_documents",
        "jobs",
        "profiles",
        "users",
        "system_settings",
    ] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            name TEXT,
            avatar TEXT,
            provider TEXT,
            provider_id TEXT,
            created_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY,
            name TEXT,
            email TEXT,
            phone TEXT,
            linkedin TEXT,
            portfolio TEXT,
            location TEXT,
            city TEXT,
            country TEXT,
            title TEXT,
            updated_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_job_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            company TEXT,
            location TEXT,
            posting TEXT,
            url TEXT,
            status TEXT DEFAULT 'saved',
            created_at TEXT,
            updated_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_cv_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Per-job CV editor documents. One document per job; content is the
    // serialized EditorDocument JSON.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cv_documents (
            id TEXT PRIMARY KEY,
            job_id TEXT UNIQUE NOT NULL,
            user_id TEXT NOT NULL,
            content TEXT NOT NULL,
            updated_at TEXT,
            FOREIGN KEY (job_id) REFERENCES jobs(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Shared raw CV data. One row per user; holds the AI-extracted
    // structured record and/or the uploaded raw text.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cv_data (
            id TEXT PRIMARY KEY,
            user_id TEXT UNIQUE NOT NULL,
            structured TEXT,
            raw_text TEXT,
            updated_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_system_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS system_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT,
            updated_by TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_jobs_user_id ON jobs(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status)",
        "CREATE INDEX IF NOT EXISTS idx_cv_documents_job_id ON cv_documents(job_id)",
        "CREATE INDEX IF NOT EXISTS idx_cv_documents_user_id ON cv_documents(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_cv_data_user_id ON cv_data(user_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

/// Initialize default system settings from environment variables
/// Only sets values if they don't already exist in the database
async fn init_default_settings(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let settings = vec![
        ("openai_api_key", "OPENAI_API_KEY"),
        ("openai_base_url", "OPENAI_BASE_URL"),
        ("openai_model_cv_extraction", "OPENAI_MODEL_CV_EXTRACTION"),
        ("openai_model_generation", "OPENAI_MODEL_GENERATION"),
        ("timezone", "TIMEZONE"),
    ];

    for (db_key, env_key) in settings {
        if let Ok(value) = env::var(env_key) {
            if !value.is_empty() {
                // Check if setting already exists
                let existing: Option<(String,)> =
                    sqlx::query_as("SELECT value FROM system_settings WHERE key = ?")
                        .bind(db_key)
                        .fetch_optional(pool)
                        .await?;

                if existing.is_none() {
                    sqlx::query(
                        r#"
                        INSERT INTO system_settings (key, value, updated_at, updated_by)
                        VALUES (?, ?, datetime('now'), 'system')
                        "#,
                    )
                    .bind(db_key)
                    .bind(&value)
                    .execute(pool)
                    .await?;

                    info!(key = %db_key, "Initialized setting from environment variable");
                }
            }
        }
    }

    Ok(())
}
