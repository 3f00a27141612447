use strata_core::ScrapeService;
use strata_core::traits::{Fetcher, Renderer};

/// Shared application state, available to all route handlers via `State<Arc<AppState<F, R>>>`.
pub struct AppState<F: Fetcher, R: Renderer> {
    pub service: ScrapeService<F, R>,
}

impl<F: Fetcher, R: Renderer> AppState<F, R> {
    pub fn new(fetcher: F, renderer: R) -> Self {
        Self {
            service: ScrapeService::new(fetcher, renderer),
        }
    }
}
