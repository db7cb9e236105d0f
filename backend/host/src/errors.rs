//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine rejected call: {0}")]
    Engine(#[from] launchpad_pool::Error),

    #[error("Fee estimate failed: {0}")]
    FeeEstimate(#[from] launchpad_pool::FeeEstimateError),
}

impl HostError {
    /// Numeric code reported to callers. Engine errors keep their own codes;
    /// host-side failures use the 1000 range.
    pub fn code(&self) -> u32 {
        match self {
            Self::Engine(e) => e.code(),
            Self::FeeEstimate(_) => 1001,
            Self::Json(_) => 1002,
            Self::Config(_) => 1003,
            Self::Database(_) | Self::Migrate(_) | Self::Io(_) => 1100,
        }
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
