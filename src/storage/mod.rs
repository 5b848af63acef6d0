//! Storage layer for assessment persistence.
//!
//! This module provides SQLite-based storage for completed assessment
//! profiles, resumable in-progress sessions, and the email delivery
//! audit log.

mod sqlite;

pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageResult;
use crate::scoring::{Assessment, ResponseSet, Scores};

/// A completed assessment profile.
///
/// Created once per finished questionnaire; the only field that is ever
/// mutated afterwards is `is_public`. Scores are stored alongside the
/// raw responses they were computed from and are never written
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile identifier.
    pub id: String,
    /// Name of the child the assessment describes.
    pub child_name: String,
    /// School grade, free-form.
    pub grade: Option<String>,
    /// Computed category scores.
    pub scores: Scores,
    /// Personality label derived from the scores.
    pub personality_label: String,
    /// Human-readable profile description.
    pub description: String,
    /// The raw responses the scores were derived from.
    pub raw_responses: ResponseSet,
    /// Whether the share token resolves for anonymous viewers.
    pub is_public: bool,
    /// Opaque token granting public read access.
    pub share_token: String,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new profile from a computed assessment.
    pub fn new(
        child_name: impl Into<String>,
        grade: Option<String>,
        assessment: Assessment,
        raw_responses: ResponseSet,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            child_name: child_name.into(),
            grade,
            scores: assessment.scores,
            personality_label: assessment.personality_label,
            description: assessment.description,
            raw_responses,
            is_public: true,
            share_token: Uuid::new_v4().simple().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Set the privacy flag.
    pub fn with_privacy(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}

/// A partially answered questionnaire, resumable across devices.
///
/// Upserted on every save, deleted on completion, and expired by the
/// store after its TTL elapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSession {
    /// Client-chosen session identifier (upsert key).
    pub session_id: String,
    /// Child name, if already entered.
    pub child_name: Option<String>,
    /// Grade, if already entered.
    pub grade: Option<String>,
    /// Answers collected so far.
    pub responses: ResponseSet,
    /// Index of the question the respondent is on.
    pub current_question: i64,
    /// Parent email for cross-device resume lookup.
    pub parent_email: Option<String>,
    /// When the session stops being resumable.
    pub expires_at: DateTime<Utc>,
    /// When the session was last saved.
    pub updated_at: DateTime<Utc>,
}

impl ProgressSession {
    /// Create a new progress session expiring after `ttl_days`.
    pub fn new(session_id: impl Into<String>, ttl_days: i64) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            child_name: None,
            grade: None,
            responses: ResponseSet::new(),
            current_question: 0,
            parent_email: None,
            expires_at: now + Duration::days(ttl_days),
            updated_at: now,
        }
    }

    /// Set the child name.
    pub fn with_child_name(mut self, child_name: impl Into<String>) -> Self {
        self.child_name = Some(child_name.into());
        self
    }

    /// Set the grade.
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Set the collected responses.
    pub fn with_responses(mut self, responses: ResponseSet) -> Self {
        self.responses = responses;
        self
    }

    /// Set the current question index.
    pub fn with_current_question(mut self, current_question: i64) -> Self {
        self.current_question = current_question;
        self
    }

    /// Set the parent email.
    pub fn with_parent_email(mut self, parent_email: impl Into<String>) -> Self {
        self.parent_email = Some(parent_email.into());
        self
    }

    /// Refresh `updated_at` and push `expires_at` out by `ttl_days`.
    pub fn touch(&mut self, ttl_days: i64) {
        let now = Utc::now();
        self.updated_at = now;
        self.expires_at = now + Duration::days(ttl_days);
    }

    /// Whether the session has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Audit record for one email delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDelivery {
    /// Unique delivery identifier.
    pub id: String,
    /// Recipient address.
    pub recipient: String,
    /// Template that was rendered.
    pub template: String,
    /// Rendered subject line.
    pub subject: String,
    /// Whether the gateway accepted the message.
    pub success: bool,
    /// Gateway error, if the attempt failed.
    pub error: Option<String>,
    /// Gateway round-trip latency in milliseconds.
    pub latency_ms: Option<i64>,
    /// When the attempt was made.
    pub created_at: DateTime<Utc>,
}

impl EmailDelivery {
    /// Create a new delivery record.
    pub fn new(
        recipient: impl Into<String>,
        template: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient: recipient.into(),
            template: template.into(),
            subject: subject.into(),
            success: true,
            error: None,
            latency_ms: None,
            created_at: Utc::now(),
        }
    }

    /// Mark as accepted by the gateway.
    pub fn success(mut self, latency_ms: i64) -> Self {
        self.success = true;
        self.latency_ms = Some(latency_ms);
        self
    }

    /// Mark as failed with the gateway error.
    pub fn failure(mut self, error: impl Into<String>, latency_ms: i64) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self.latency_ms = Some(latency_ms);
        self
    }
}

/// Storage trait for database operations.
#[async_trait]
pub trait Storage: Send + Sync {
    // Profile operations

    /// Persist a new profile.
    async fn create_profile(&self, profile: &Profile) -> StorageResult<()>;
    /// Get a profile by primary id.
    async fn get_profile(&self, id: &str) -> StorageResult<Option<Profile>>;
    /// Get a public profile by share token. Private profiles are absent.
    async fn get_profile_by_share_token(&self, token: &str) -> StorageResult<Option<Profile>>;
    /// Toggle the privacy flag. Errors when the id is unknown.
    async fn set_profile_privacy(&self, id: &str, is_public: bool) -> StorageResult<()>;

    // Progress operations

    /// Insert or replace a progress session keyed by `session_id`.
    async fn save_progress(&self, session: &ProgressSession) -> StorageResult<()>;
    /// Get an unexpired progress session by id. Expired rows are removed.
    async fn get_progress(&self, session_id: &str) -> StorageResult<Option<ProgressSession>>;
    /// Get the most recently saved unexpired session for a parent email.
    async fn get_progress_by_email(
        &self,
        parent_email: &str,
    ) -> StorageResult<Option<ProgressSession>>;
    /// Delete a progress session by id.
    async fn delete_progress(&self, session_id: &str) -> StorageResult<()>;
    /// Delete every expired progress session, returning the count.
    async fn purge_expired_progress(&self) -> StorageResult<u64>;

    // Email audit log

    /// Record an email delivery attempt.
    async fn log_email_delivery(&self, delivery: &EmailDelivery) -> StorageResult<()>;
}
