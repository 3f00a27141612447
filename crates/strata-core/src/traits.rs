use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::models::RenderedPage;

/// Fetches raw HTML content from a URL without executing scripts.
///
/// Implementations follow redirects and map non-2xx statuses to
/// [`AppError::HttpStatus`].
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Produces the fully rendered DOM of a URL after client-side interactions.
///
/// Each call owns an isolated browser session that is released before the
/// call returns, whatever the outcome.
pub trait Renderer: Send + Sync + Clone {
    fn render(&self, url: &str) -> impl Future<Output = Result<RenderedPage, AppError>> + Send;
}

/// A live, rendered page that can be queried and driven.
///
/// This is the narrow surface the interaction engine needs from a browser
/// automation engine. Every operation may fail on timeout or protocol error.
pub trait PageDriver: Send + Sync {
    /// Handle to an element of the current document.
    type Element: Send + Sync;

    /// Navigate to `url` and wait for the navigation to commit.
    fn goto(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Wait until `document.readyState` is no longer `loading`.
    fn wait_for_dom_ready(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// All elements matching a CSS selector, in document order.
    fn query_all(
        &self,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<Self::Element>, AppError>> + Send;

    /// Text content of an element.
    fn text(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    fn click(
        &self,
        element: &Self::Element,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Evaluate a JavaScript expression and return its JSON value.
    fn evaluate(
        &self,
        expression: &str,
    ) -> impl Future<Output = Result<serde_json::Value, AppError>> + Send;

    /// Pause for a fixed duration.
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    fn current_url(&self) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Navigate back in history and wait for the previous document.
    fn go_back(&self, timeout: Duration) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Serialize the current DOM to markup.
    fn content(&self) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// A renderer that always fails, used when no browser engine is available.
///
/// The static fetch still works; the orchestrator records the failure as a
/// render-phase error.
#[derive(Debug, Clone, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    async fn render(&self, _url: &str) -> Result<RenderedPage, AppError> {
        Err(AppError::BrowserError(
            "browser rendering is not available in this build".to_string(),
        ))
    }
}
