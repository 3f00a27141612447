use std::sync::Arc;

use axum::Router;

use strata_core::AppError;
use strata_core::testutil::{MockFetcher, MockRenderer};
use strata_server::routes;
use strata_server::state::AppState;

pub const STATIC_PAGE: &str = r#"<html lang="en"><head><title>Acme</title></head><body>
  <nav><a href="/">Home Page</a> <a href="/products">Products Catalogue</a> <a href="/contact">Contact the Support Team</a></nav>
  <main><h1>Welcome to Acme</h1><p>Rockets, anvils and gadgets shipped across the whole desert.</p></main>
</body></html>"#;

/// Test app plus handles on its collaborators for call assertions.
pub struct TestApp {
    pub router: Router,
    pub fetcher: MockFetcher,
    pub renderer: MockRenderer,
}

fn build(fetcher: MockFetcher, renderer: MockRenderer) -> TestApp {
    let state = Arc::new(AppState::new(fetcher.clone(), renderer.clone()));
    TestApp {
        router: routes::router(state),
        fetcher,
        renderer,
    }
}

/// App whose static fetch returns [`STATIC_PAGE`] and whose renderer fails.
pub fn setup_test_app() -> TestApp {
    build(
        MockFetcher::new(STATIC_PAGE),
        MockRenderer::with_error(AppError::BrowserError("no browser in tests".into())),
    )
}

/// App whose static fetch fails with the given error.
pub fn setup_failing_fetch_app(error: AppError) -> TestApp {
    build(
        MockFetcher::with_error(error),
        MockRenderer::with_error(AppError::BrowserError("unreachable".into())),
    )
}
