//! Session-cookie access control middleware.
//!
//! The UI stores a percent-encoded JSON object in the session cookie:
//! `{ "userId": "...", "userType": "parent" | "teacher" }`. Requests
//! without a decodable session are answered with 401 and the login URL
//! so the client can redirect.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::SharedState;
use crate::config::AuthConfig;

/// Kind of signed-in respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// A parent answering about their own child.
    Parent,
    /// A teacher answering about a student.
    Teacher,
}

/// The authenticated session decoded from the cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Opaque user identifier.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Whether the session belongs to a parent or a teacher.
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

/// Gate a request on a valid session cookie.
///
/// On success the decoded [`SessionUser`] is inserted into request
/// extensions for handlers to read.
pub async fn require_session(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    match session_from_headers(&state.config.auth, req.headers()) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => {
            debug!("Rejecting request without a valid session cookie");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Authentication required",
                    "login": state.config.auth.login_url,
                })),
            )
                .into_response()
        }
    }
}

/// Decode the session cookie, treating anything malformed as absent.
fn session_from_headers(auth: &AuthConfig, headers: &HeaderMap) -> Option<SessionUser> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    let value = raw.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == auth.cookie_name).then_some(value)
    })?;

    let decoded = urlencoding::decode(value).ok()?;
    serde_json::from_str(&decoded).ok()
}
