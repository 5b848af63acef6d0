use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub email: EmailConfig,
    pub request: RequestConfig,
    pub logging: LoggingConfig,
    pub retention: RetentionConfig,
    pub auth: AuthConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used when building share links returned to clients.
    pub public_base_url: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

/// Email gateway configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub base_url: String,
    pub sender_email: String,
    pub sender_name: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Outbound HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

/// Retention policy for in-progress assessment sessions
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    pub progress_ttl_days: i64,
    pub sweep_interval_secs: u64,
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub cookie_name: String,
    /// Where unauthenticated clients are told to sign in.
    pub login_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        };

        let database = DatabaseConfig {
            path: PathBuf::from(
                env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/assessment.db".to_string()),
            ),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        };

        let email = EmailConfig {
            api_key: env::var("EMAIL_API_KEY").map_err(|_| AppError::Config {
                message: "EMAIL_API_KEY is required".to_string(),
            })?,
            base_url: env::var("EMAIL_BASE_URL")
                .unwrap_or_else(|_| "https://api.mailgate.io".to_string()),
            sender_email: env::var("EMAIL_SENDER")
                .unwrap_or_else(|_| "no-reply@sixc-assessment.app".to_string()),
            sender_name: env::var("EMAIL_SENDER_NAME")
                .unwrap_or_else(|_| "6C Assessment".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
            max_retries: env::var("MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: env::var("RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        };

        let retention = RetentionConfig {
            progress_ttl_days: env::var("PROGRESS_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            sweep_interval_secs: env::var("PROGRESS_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(43200),
        };

        let auth = AuthConfig {
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "session".to_string()),
            login_url: env::var("LOGIN_URL").unwrap_or_else(|_| "/login".to_string()),
        };

        Ok(Config {
            server,
            database,
            email,
            request,
            logging,
            retention,
            auth,
        })
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            progress_ttl_days: 7,
            sweep_interval_secs: 43200,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            login_url: "/login".to_string(),
        }
    }
}
