//! HTTP server for the assessment API.
//!
//! This module provides:
//! - Axum router and endpoint handlers
//! - Session-cookie access control middleware
//! - Shared application state management

pub mod auth;
mod handlers;

pub use auth::{SessionUser, UserType};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::email::{EmailClient, Mailer};
use crate::storage::SqliteStorage;

/// Application state shared across handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// SQLite storage backend.
    pub storage: SqliteStorage,
    /// Notification dispatcher.
    pub mailer: Mailer,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, storage: SqliteStorage, email: EmailClient) -> Self {
        let mailer = Mailer::new(storage.clone(), email, &config.email);

        Self {
            config,
            storage,
            mailer,
        }
    }

    /// Absolute share URL for a profile token.
    pub fn share_url(&self, token: &str) -> String {
        format!(
            "{}/share/{}",
            self.config.server.public_base_url.trim_end_matches('/'),
            token
        )
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Build the API router.
///
/// `/health` and `/share/{token}` are the public surface; every other
/// route sits behind the session-cookie middleware.
pub fn build_router(state: SharedState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/share/{token}", get(handlers::get_shared_profile));

    let protected = Router::new()
        .route("/profiles", post(handlers::create_profile))
        .route("/profiles/{id}", get(handlers::get_profile))
        .route("/profiles/{id}/privacy", patch(handlers::set_profile_privacy))
        .route(
            "/assessment-progress",
            post(handlers::save_progress)
                .get(handlers::get_progress)
                .delete(handlers::delete_progress),
        )
        .route("/notifications", post(handlers::send_notifications))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    public
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the API until the process exits.
pub async fn serve(state: SharedState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    )
    .parse()?;

    let router = build_router(state);

    info!("Assessment API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
