use chrono::Utc;
use url::Url;

use crate::error::AppError;
use crate::extract::{ParsedPage, needs_rendering, parse_page};
use crate::models::{ScrapeError, ScrapeResult};
use crate::traits::{Fetcher, Renderer};

/// Orchestrates one scrape: static fetch → parse → rendered fetch → merge.
///
/// Generic over both fetch strategies via traits, enabling dependency injection
/// and testability without real HTTP or browser calls.
pub struct ScrapeService<F, R>
where
    F: Fetcher,
    R: Renderer,
{
    fetcher: F,
    renderer: R,
}

impl<F, R> ScrapeService<F, R>
where
    F: Fetcher,
    R: Renderer,
{
    pub fn new(fetcher: F, renderer: R) -> Self {
        Self { fetcher, renderer }
    }

    /// Scrape a URL. Never fails: problems are recorded in `errors`.
    ///
    /// 1. Fetch the static markup; a failure here ends the scrape
    /// 2. Parse meta and sections from it
    /// 3. Render the page with interactions and parse that too
    /// 4. Keep the rendered sections only if there are strictly more of them,
    ///    the rendered meta only if it has a title, and always the rendered
    ///    interaction log
    pub async fn scrape(&self, url: &str) -> ScrapeResult {
        let mut result = ScrapeResult::empty(url, Utc::now());

        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => {
                let err = AppError::InvalidUrl(format!("{url}: {e}"));
                result.errors.push(ScrapeError::fetch(err.to_string()));
                return result;
            }
        };

        // 1. Static fetch
        tracing::info!("Fetching {}", url);
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(timeout = e.is_timeout(), "Static fetch failed: {e}");
                result.errors.push(ScrapeError::fetch(e.to_string()));
                return result;
            }
        };
        tracing::info!("Fetched {} bytes of HTML", html.len());

        // 2. Parse
        let ParsedPage { meta, sections } = parse_page(&html, &base);
        if needs_rendering(&html, &sections) {
            tracing::info!(
                sections = sections.len(),
                "Static markup looks client-rendered"
            );
        }
        result.meta = meta;
        result.sections = sections;

        // 3 & 4. Render + merge
        match self.renderer.render(url).await {
            Ok(rendered) => {
                let parsed = parse_page(&rendered.html, &base);
                if parsed.sections.len() > result.sections.len() {
                    tracing::info!(
                        before = result.sections.len(),
                        after = parsed.sections.len(),
                        "Using rendered sections"
                    );
                    result.sections = parsed.sections;
                }
                if !parsed.meta.title.is_empty() {
                    result.meta = parsed.meta;
                }
                result.interactions = rendered.interactions;
            }
            Err(e) => {
                tracing::warn!(timeout = e.is_timeout(), "Rendering failed: {e}");
                result.errors.push(ScrapeError::render(format!(
                    "Rendering failed, no interactions performed: {e}"
                )));
            }
        }

        tracing::info!(
            sections = result.sections.len(),
            errors = result.errors.len(),
            "Scrape complete"
        );
        result
    }
}
