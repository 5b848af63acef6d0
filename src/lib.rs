//! # 6C Assessment Server
//!
//! Backend for a children's learning-style assessment: parents and
//! teachers answer a fixed questionnaire, the service computes a
//! six-category ("6C") learning profile with a personality label, stores
//! it, and exposes it through shareable links.
//!
//! ## Features
//!
//! - **Scoring Engine**: pure, deterministic weighted scoring of the
//!   24-item questionnaire into six category scores, a label, and a
//!   description
//! - **Profile Store**: SQLite-backed profiles with opaque share tokens
//!   and a privacy toggle
//! - **Progress Persistence**: resumable partial answers with a 7-day
//!   expiry, upserted per session
//! - **Email Gateway**: templated invitation/reminder/thank-you emails
//!   with per-recipient delivery reporting
//! - **Access Control**: session-cookie middleware in front of every
//!   non-public route
//!
//! ## Architecture
//!
//! ```text
//! Browser → Axum HTTP API → Scoring Engine (pure)
//!                 ↓                ↓
//!           SQLite (profiles, progress)   Email gateway (HTTP)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sixc_assessment::{config::Config, server::{self, AppState}};
//! use sixc_assessment::email::EmailClient;
//! use sixc_assessment::storage::SqliteStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let storage = SqliteStorage::new(&config.database).await?;
//!     let email = EmailClient::new(&config.email, config.request.clone())?;
//!     let state = Arc::new(AppState::new(config, storage, email));
//!     server::serve(state).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management for the server.
pub mod config;
/// Email gateway client, templates, and batch dispatch.
pub mod email;
/// Error types and result aliases for the application.
pub mod error;
/// The pure 6C scoring engine and questionnaire catalog.
pub mod scoring;
/// HTTP server, handlers, and access control middleware.
pub mod server;
/// SQLite storage layer for persistence.
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, SharedState};
