//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` or `Mutex<_>` for interior mutability,
//! allowing test assertions on recorded calls.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::RenderedPage;
use crate::traits::{Fetcher, PageDriver, Renderer};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

/// Mock renderer that returns queued pages and counts invocations.
#[derive(Clone)]
pub struct MockRenderer {
    responses: Arc<Mutex<Vec<Result<RenderedPage, AppError>>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockRenderer {
    pub fn new(page: RenderedPage) -> Self {
        Self::with_responses(vec![Ok(page)])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<RenderedPage, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Renderer for MockRenderer {
    async fn render(&self, _url: &str) -> Result<RenderedPage, AppError> {
        *self.calls.lock().unwrap() += 1;
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(RenderedPage::default())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockPage
// ---------------------------------------------------------------------------

/// Element handle served by [`MockPage`].
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    text: String,
    attributes: HashMap<String, String>,
    fail_click: bool,
}

impl MockElement {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Clicking this element fails with a timeout.
    pub fn failing(mut self) -> Self {
        self.fail_click = true;
        self
    }
}

#[derive(Default)]
struct PageState {
    history: Vec<String>,
    clicked: Vec<String>,
    visited: Vec<String>,
    back_count: usize,
    scroll_heights: VecDeque<f64>,
    last_height: f64,
}

/// Scriptable in-memory page.
///
/// Selectors are matched by exact string against the configured element
/// lists; unknown selectors return no elements. `wait` returns immediately.
pub struct MockPage {
    state: Mutex<PageState>,
    elements: HashMap<String, Vec<MockElement>>,
    failing_navigation: HashSet<String>,
    evaluate_error: bool,
    content: String,
}

impl MockPage {
    pub fn new(url: &str) -> Self {
        Self {
            state: Mutex::new(PageState {
                history: vec![url.to_string()],
                last_height: 1000.0,
                ..PageState::default()
            }),
            elements: HashMap::new(),
            failing_navigation: HashSet::new(),
            evaluate_error: false,
            content: "<html><body></body></html>".to_string(),
        }
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<MockElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }

    /// Successive `document.body.scrollHeight` values; the last one repeats.
    pub fn with_scroll_heights(self, heights: Vec<f64>) -> Self {
        self.state.lock().unwrap().scroll_heights = heights.into();
        self
    }

    /// Every script evaluation fails.
    pub fn with_evaluate_error(mut self) -> Self {
        self.evaluate_error = true;
        self
    }

    /// Navigating to `url` times out.
    pub fn with_failing_navigation(mut self, url: &str) -> Self {
        self.failing_navigation.insert(url.to_string());
        self
    }

    pub fn with_content(mut self, html: &str) -> Self {
        self.content = html.to_string();
        self
    }

    /// Texts of the elements clicked so far, in order.
    pub fn clicked(&self) -> Vec<String> {
        self.state.lock().unwrap().clicked.clone()
    }

    /// URLs passed to `goto`, in order.
    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn back_count(&self) -> usize {
        self.state.lock().unwrap().back_count
    }
}

impl PageDriver for MockPage {
    type Element = MockElement;

    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        if self.failing_navigation.contains(url) {
            return Err(AppError::Timeout(timeout.as_secs()));
        }
        state.history.push(url.to_string());
        Ok(())
    }

    async fn wait_for_dom_ready(&self, _timeout: Duration) -> Result<(), AppError> {
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<MockElement>, AppError> {
        Ok(self.elements.get(selector).cloned().unwrap_or_default())
    }

    async fn text(&self, element: &MockElement) -> Result<Option<String>, AppError> {
        Ok(Some(element.text.clone()))
    }

    async fn attribute(&self, element: &MockElement, name: &str) -> Result<Option<String>, AppError> {
        Ok(element.attributes.get(name).cloned())
    }

    async fn click(&self, element: &MockElement, timeout: Duration) -> Result<(), AppError> {
        if element.fail_click {
            return Err(AppError::Timeout(timeout.as_secs()));
        }
        self.state.lock().unwrap().clicked.push(element.text.clone());
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, AppError> {
        if self.evaluate_error {
            return Err(AppError::BrowserError("evaluation failed".to_string()));
        }
        if !expression.contains("scrollHeight") {
            return Ok(serde_json::Value::Null);
        }
        let mut state = self.state.lock().unwrap();
        if let Some(height) = state.scroll_heights.pop_front() {
            state.last_height = height;
        }
        Ok(serde_json::json!(state.last_height))
    }

    async fn wait(&self, _duration: Duration) {}

    async fn current_url(&self) -> Result<String, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.history.last().cloned().unwrap_or_default())
    }

    async fn go_back(&self, _timeout: Duration) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.back_count += 1;
        if state.history.len() > 1 {
            state.history.pop();
        }
        Ok(())
    }

    async fn content(&self) -> Result<String, AppError> {
        Ok(self.content.clone())
    }
}
