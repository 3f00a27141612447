use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use strata_core::parse_target_url;
use strata_core::traits::{Fetcher, Renderer};

use crate::dto::{HealthResponse, ScrapeRequest, ScrapeResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router<F, R>(state: Arc<AppState<F, R>>) -> Router
where
    F: Fetcher + 'static,
    R: Renderer + 'static,
{
    Router::new()
        .route("/healthz", get(health))
        .route("/scrape", post(scrape::<F, R>))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

/// Scrape one page. Only an invalid URL is a request error; fetch and render
/// failures are reported inside the result.
pub async fn scrape<F, R>(
    State(state): State<Arc<AppState<F, R>>>,
    axum::Json(body): axum::Json<ScrapeRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Fetcher,
    R: Renderer,
{
    let url = parse_target_url(&body.url)?;
    let result = state.service.scrape(url.as_str()).await;

    Ok(axum::Json(ScrapeResponse { result }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

pub async fn health() -> impl IntoResponse {
    axum::Json(HealthResponse { status: "ok" })
}
