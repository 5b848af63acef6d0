use async_trait::async_trait;
use chrono::Utc;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use super::{EmailDelivery, Profile, ProgressSession, Storage};
use crate::config::DatabaseConfig;
use crate::error::{StorageError, StorageResult};

/// Static migrator that embeds migrations at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed storage implementation
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    pub async fn new(config: &DatabaseConfig) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Connection {
                message: format!("Failed to create database directory: {}", e),
            })?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|e| StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Create an in-memory storage instance, used by tests
    pub async fn new_in_memory() -> StorageResult<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
                StorageError::Connection {
                    message: format!("Invalid database URL: {}", e),
                }
            })?;

        // A single connection keeps every query on the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Run database migrations using embedded sqlx migrations
    async fn run_migrations(&self) -> StorageResult<()> {
        info!("Running database migrations...");

        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration {
                message: format!("Failed to run migrations: {}", e),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying pool for advanced queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_profile(&self, profile: &Profile) -> StorageResult<()> {
        let scores = serde_json::to_string(&profile.scores).unwrap_or_default();
        let raw_responses = serde_json::to_string(&profile.raw_responses).unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO profiles
                (id, child_name, grade, scores, personality_label, description,
                 raw_responses, is_public, share_token, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.child_name)
        .bind(&profile.grade)
        .bind(&scores)
        .bind(&profile.personality_label)
        .bind(&profile.description)
        .bind(&raw_responses)
        .bind(profile.is_public)
        .bind(&profile.share_token)
        .bind(profile.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_profile(&self, id: &str) -> StorageResult<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, child_name, grade, scores, personality_label, description,
                   raw_responses, is_public, share_token, created_at
            FROM profiles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    async fn get_profile_by_share_token(&self, token: &str) -> StorageResult<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, child_name, grade, scores, personality_label, description,
                   raw_responses, is_public, share_token, created_at
            FROM profiles
            WHERE share_token = ? AND is_public = 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    async fn set_profile_privacy(&self, id: &str, is_public: bool) -> StorageResult<()> {
        let result = sqlx::query("UPDATE profiles SET is_public = ? WHERE id = ?")
            .bind(is_public)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ProfileNotFound {
                profile_id: id.to_string(),
            });
        }

        Ok(())
    }

    async fn save_progress(&self, session: &ProgressSession) -> StorageResult<()> {
        let responses = serde_json::to_string(&session.responses).unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO progress_sessions
                (session_id, child_name, grade, responses, current_question,
                 parent_email, expires_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                child_name = excluded.child_name,
                grade = excluded.grade,
                responses = excluded.responses,
                current_question = excluded.current_question,
                parent_email = excluded.parent_email,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&session.session_id)
        .bind(&session.child_name)
        .bind(&session.grade)
        .bind(&responses)
        .bind(session.current_question)
        .bind(&session.parent_email)
        .bind(session.expires_at.to_rfc3339())
        .bind(session.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_progress(&self, session_id: &str) -> StorageResult<Option<ProgressSession>> {
        let row: Option<ProgressRow> = sqlx::query_as(
            r#"
            SELECT session_id, child_name, grade, responses, current_question,
                   parent_email, expires_at, updated_at
            FROM progress_sessions
            WHERE session_id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(session) = row.map(ProgressSession::from) else {
            return Ok(None);
        };

        // The store enforces expiry: an expired row reads as absent.
        if session.is_expired(Utc::now()) {
            debug!(session_id = %session.session_id, "Dropping expired progress session");
            self.delete_progress(&session.session_id).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn get_progress_by_email(
        &self,
        parent_email: &str,
    ) -> StorageResult<Option<ProgressSession>> {
        let row: Option<ProgressRow> = sqlx::query_as(
            r#"
            SELECT session_id, child_name, grade, responses, current_question,
                   parent_email, expires_at, updated_at
            FROM progress_sessions
            WHERE parent_email = ? AND expires_at > ?
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(parent_email)
        .bind(Utc::now().to_rfc3339())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProgressSession::from))
    }

    async fn delete_progress(&self, session_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM progress_sessions WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired_progress(&self) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM progress_sessions WHERE expires_at <= ?")
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn log_email_delivery(&self, delivery: &EmailDelivery) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO email_deliveries
                (id, recipient, template, subject, success, error, latency_ms, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&delivery.id)
        .bind(&delivery.recipient)
        .bind(&delivery.template)
        .bind(&delivery.subject)
        .bind(delivery.success)
        .bind(&delivery.error)
        .bind(delivery.latency_ms)
        .bind(delivery.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// Internal row types for SQLx mapping
#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: String,
    child_name: String,
    grade: Option<String>,
    scores: String,
    personality_label: String,
    description: String,
    raw_responses: String,
    is_public: bool,
    share_token: String,
    created_at: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            child_name: row.child_name,
            grade: row.grade,
            scores: serde_json::from_str(&row.scores).unwrap_or_default(),
            personality_label: row.personality_label,
            description: row.description,
            raw_responses: serde_json::from_str(&row.raw_responses).unwrap_or_default(),
            is_public: row.is_public,
            share_token: row.share_token,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    session_id: String,
    child_name: Option<String>,
    grade: Option<String>,
    responses: String,
    current_question: i64,
    parent_email: Option<String>,
    expires_at: String,
    updated_at: String,
}

impl From<ProgressRow> for ProgressSession {
    fn from(row: ProgressRow) -> Self {
        Self {
            session_id: row.session_id,
            child_name: row.child_name,
            grade: row.grade,
            responses: serde_json::from_str(&row.responses).unwrap_or_default(),
            current_question: row.current_question,
            parent_email: row.parent_email,
            expires_at: parse_timestamp(&row.expires_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

fn parse_timestamp(raw: &str) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
