//! Error types for the birthday reactor
//!
//! - `DiscordError`: Discord REST client errors
//! - `ConfigError`: environment configuration errors
//! - `LinkError`: channel link parsing errors
//! - `AppError`: run-level errors surfaced to `main`

use thiserror::Error;

/// Discord REST client errors
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid token")]
    Unauthorized,

    #[error("Token is not a valid header value")]
    InvalidToken,

    #[error("Forbidden - missing permission")]
    Forbidden,

    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: f64 },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not found in environment or .env file")]
    Missing(&'static str),
}

/// Channel link parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("link has no 'channels' path segment")]
    MissingChannelsSegment,

    #[error("link is missing a container or channel id")]
    MissingIds,
}

/// Run-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discord error: {0}")]
    Discord(#[from] DiscordError),

    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl AppError {
    /// Only a missing configuration fails the process; every other error
    /// ends the run quietly.
    pub fn fails_process(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}
