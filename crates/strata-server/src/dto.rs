use serde::{Deserialize, Serialize};

use strata_core::models::ScrapeResult;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    /// Absolute http(s) URL of the page to scrape
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub result: ScrapeResult,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
