use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::auth::SessionUser;
use super::SharedState;
use crate::email::{SendBatch, SendReport};
use crate::error::{ApiError, ApiResult};
use crate::scoring::{self, ResponseSet};
use crate::storage::{Profile, ProgressSession, Storage};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub child_name: String,
    #[serde(default)]
    pub grade: Option<String>,
    pub responses: ResponseSet,
    /// Progress session to discard once the assessment is complete.
    #[serde(default)]
    pub progress_session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateProfileResponse {
    pub profile: Profile,
    pub share_url: String,
}

/// Submit a complete response set and create the profile.
pub async fn create_profile(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<CreateProfileResponse>)> {
    let child_name = body.child_name.trim();
    if child_name.is_empty() {
        return Err(ApiError::Validation {
            field: "child_name".to_string(),
            reason: "cannot be empty".to_string(),
        });
    }

    let assessment = scoring::score(&body.responses);
    let profile = Profile::new(child_name, body.grade, assessment, body.responses);

    state
        .storage
        .create_profile(&profile)
        .await
        .map_err(ApiError::from)?;

    // The assessment is complete; its saved progress is no longer needed.
    if let Some(session_id) = &body.progress_session_id {
        if let Err(e) = state.storage.delete_progress(session_id).await {
            warn!(session_id = %session_id, error = %e, "Failed to discard completed progress");
        }
    }

    info!(
        profile_id = %profile.id,
        user_id = %user.user_id,
        label = %profile.personality_label,
        "Profile created"
    );

    let share_url = state.share_url(&profile.share_token);
    Ok((
        StatusCode::CREATED,
        Json(CreateProfileResponse { profile, share_url }),
    ))
}

/// Fetch a profile by primary id.
pub async fn get_profile(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Profile>> {
    match state.storage.get_profile(&id).await.map_err(ApiError::from)? {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::NotFound {
            resource: "profile".to_string(),
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetPrivacyRequest {
    pub is_public: bool,
}

/// Toggle whether the share token resolves publicly.
pub async fn set_profile_privacy(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<SetPrivacyRequest>,
) -> ApiResult<Json<Value>> {
    state
        .storage
        .set_profile_privacy(&id, body.is_public)
        .await
        .map_err(ApiError::from)?;

    info!(profile_id = %id, is_public = body.is_public, "Profile privacy updated");

    Ok(Json(json!({ "id": id, "is_public": body.is_public })))
}

/// Public profile view by share token.
pub async fn get_shared_profile(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> ApiResult<Json<Profile>> {
    match state
        .storage
        .get_profile_by_share_token(&token)
        .await
        .map_err(ApiError::from)?
    {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::NotFound {
            resource: "profile".to_string(),
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveProgressRequest {
    pub session_id: String,
    #[serde(default)]
    pub child_name: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub responses: ResponseSet,
    #[serde(default)]
    pub current_question: i64,
    #[serde(default)]
    pub parent_email: Option<String>,
}

/// Upsert partial questionnaire progress.
pub async fn save_progress(
    State(state): State<SharedState>,
    Json(body): Json<SaveProgressRequest>,
) -> ApiResult<Json<ProgressSession>> {
    if body.session_id.trim().is_empty() {
        return Err(ApiError::Validation {
            field: "session_id".to_string(),
            reason: "cannot be empty".to_string(),
        });
    }

    let ttl_days = state.config.retention.progress_ttl_days;
    let mut session = ProgressSession::new(body.session_id, ttl_days)
        .with_responses(body.responses)
        .with_current_question(body.current_question);
    if let Some(child_name) = body.child_name {
        session = session.with_child_name(child_name);
    }
    if let Some(grade) = body.grade {
        session = session.with_grade(grade);
    }
    if let Some(parent_email) = body.parent_email {
        session = session.with_parent_email(parent_email);
    }

    state
        .storage
        .save_progress(&session)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub parent_email: Option<String>,
}

/// Resume lookup by session id or parent email.
pub async fn get_progress(
    State(state): State<SharedState>,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Json<ProgressSession>> {
    let session = if let Some(session_id) = &query.session_id {
        state
            .storage
            .get_progress(session_id)
            .await
            .map_err(ApiError::from)?
    } else if let Some(parent_email) = &query.parent_email {
        state
            .storage
            .get_progress_by_email(parent_email)
            .await
            .map_err(ApiError::from)?
    } else {
        return Err(ApiError::Validation {
            field: "session_id".to_string(),
            reason: "session_id or parent_email is required".to_string(),
        });
    };

    match session {
        Some(session) => Ok(Json(session)),
        None => Err(ApiError::NotFound {
            resource: "assessment progress".to_string(),
        }),
    }
}

/// Discard saved progress.
pub async fn delete_progress(
    State(state): State<SharedState>,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Json<Value>> {
    let Some(session_id) = query.session_id else {
        return Err(ApiError::Validation {
            field: "session_id".to_string(),
            reason: "session_id is required".to_string(),
        });
    };

    state
        .storage
        .delete_progress(&session_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(json!({ "deleted": true })))
}

/// Send a templated notification batch to parents.
pub async fn send_notifications(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(batch): Json<SendBatch>,
) -> ApiResult<Json<SendReport>> {
    info!(
        user_id = %user.user_id,
        template = %batch.template,
        recipients = batch.recipients.len(),
        "Dispatching notification batch"
    );

    let report = state
        .mailer
        .process(batch)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(report))
}
