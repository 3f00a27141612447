use thiserror::Error;

/// Application-wide error types for Strata.
///
/// These never escape [`crate::scrape::ScrapeService::scrape`]; the orchestrator
/// converts them into phase-tagged [`crate::models::ScrapeError`] entries.
#[derive(Error, Debug)]
pub enum AppError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Browser launch, protocol or page operation failed.
    #[error("Browser error: {0}")]
    BrowserError(String),

    /// The target URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration value missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error was caused by a timeout expiring.
    pub fn is_timeout(&self) -> bool {
        match self {
            AppError::Timeout(_) => true,
            AppError::HttpError(msg) | AppError::BrowserError(msg) => {
                msg.to_lowercase().contains("timeout") || msg.to_lowercase().contains("timed out")
            }
            _ => false,
        }
    }

    /// Returns true if the error is a precondition failure the caller should see
    /// as a client error rather than a scrape outcome.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidUrl(_))
    }
}
