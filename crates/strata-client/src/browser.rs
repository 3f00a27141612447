use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::element::Element;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use strata_core::config::RenderConfig;
use strata_core::error::AppError;
use strata_core::models::RenderedPage;
use strata_core::render::render_page;
use strata_core::traits::{PageDriver, Renderer};
use tokio::task::JoinHandle;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Headless-browser renderer using Chromium via the Chrome DevTools Protocol.
///
/// Unlike [`super::ReqwestFetcher`], this executes JavaScript and explores the
/// page (tabs, load-more buttons, scrolling, shallow pagination) before
/// returning the DOM.
///
/// Every [`Renderer::render`] call launches its own Chromium process and shuts
/// it down before returning, on success and on failure alike.
///
/// # Example
///
/// ```rust,no_run
/// use strata_client::ChromiumRenderer;
/// use strata_core::traits::Renderer;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let renderer = ChromiumRenderer::new();
/// let page = renderer.render("https://example.com").await?;
/// println!("{} clicks, {} bytes", page.interactions.clicks.len(), page.html.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct ChromiumRenderer {
    config: RenderConfig,
}

impl ChromiumRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Tries to locate the real Chrome/Chromium binary.
    ///
    /// On systems where Chromium is installed via **snap**, the wrapper at
    /// `/snap/bin/chromium` strips unknown CLI flags, breaking headless mode.
    /// We look for the real binary inside the snap first, then fall back to
    /// well-known system paths.  If nothing is found we return `None` and let
    /// `chromiumoxide` do its own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        let candidates: &[&str] = &[
            // Snap (Ubuntu default)
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            // Flatpak
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            // Common apt / manual installs
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];

        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        candidates
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }
}

impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, AppError> {
        let session = BrowserSession::launch(&self.config).await?;
        let result = session.render(url, &self.config).await;
        session.close().await;
        result
    }
}

/// One headless Chromium process and the task driving its CDP connection.
///
/// [`close`](Self::close) shuts the browser down gracefully. If a session is
/// dropped without being closed, the handler task is aborted and the
/// `Browser` kills its child process on drop.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: &RenderConfig) -> Result<Self, AppError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        if let Some(bin) = ChromiumRenderer::find_chrome_binary() {
            tracing::debug!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        let browser_config = builder
            .window_size(config.viewport_width, config.viewport_height)
            .viewport(Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                ..Viewport::default()
            })
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .arg(format!("--user-agent={}", config.user_agent))
            .build()
            .map_err(|e| AppError::BrowserError(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work,
        // including after a malformed event.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser CDP handler error: {e}");
                }
            }
        });

        Ok(Self { browser, handler })
    }

    async fn render(&self, url: &str, config: &RenderConfig) -> Result<RenderedPage, AppError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to open page: {e}")))?;
        render_page(&ChromiumPage::new(page), url, config).await
    }

    /// Ask Chromium to quit and wait for it; kill the process if it won't.
    async fn close(mut self) {
        let browser = &mut self.browser;
        let graceful = async move {
            browser
                .close()
                .await
                .map_err(|e| format!("close failed: {e}"))?;
            browser
                .wait()
                .await
                .map_err(|e| format!("wait failed: {e}"))?;
            Ok(())
        };
        let Err(reason) = within_shutdown(SHUTDOWN_TIMEOUT, graceful).await else {
            return;
        };

        tracing::debug!("Browser shutdown failed ({reason}), killing process");
        if let Some(Err(e)) = self.browser.kill().await {
            tracing::debug!("Failed to kill browser: {e}");
        }
    }
}

/// Bound a graceful shutdown; `Err` carries why the process must be killed.
async fn within_shutdown(
    deadline: Duration,
    graceful: impl Future<Output = Result<(), String>>,
) -> Result<(), String> {
    match tokio::time::timeout(deadline, graceful).await {
        Ok(result) => result,
        Err(_) => Err(format!("no exit within {}s", deadline.as_secs())),
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// A Chromium tab driven through [`PageDriver`].
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

/// Run a CDP operation under a deadline.
async fn within<T, E: std::fmt::Display>(
    timeout: Duration,
    what: &str,
    operation: impl Future<Output = Result<T, E>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(timeout, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AppError::BrowserError(format!("{what} failed: {e}"))),
        Err(_) => Err(AppError::Timeout(timeout.as_secs())),
    }
}

fn cdp_error(what: &str) -> impl FnOnce(chromiumoxide::error::CdpError) -> AppError + '_ {
    move |e| AppError::BrowserError(format!("{what} failed: {e}"))
}

impl PageDriver for ChromiumPage {
    type Element = Element;

    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), AppError> {
        within(timeout, "Navigation", self.page.goto(url)).await?;
        Ok(())
    }

    async fn wait_for_dom_ready(&self, timeout: Duration) -> Result<(), AppError> {
        let poll = async {
            loop {
                let state = self.evaluate("document.readyState").await?;
                if state.as_str().is_some_and(|s| s != "loading") {
                    return Ok::<(), AppError>(());
                }
                tokio::time::sleep(READY_POLL_INTERVAL).await;
            }
        };
        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(timeout.as_secs())),
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>, AppError> {
        self.page
            .find_elements(selector)
            .await
            .map_err(cdp_error("Element lookup"))
    }

    async fn text(&self, element: &Element) -> Result<Option<String>, AppError> {
        element.inner_text().await.map_err(cdp_error("Reading text"))
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>, AppError> {
        element
            .attribute(name)
            .await
            .map_err(cdp_error("Reading attribute"))
    }

    async fn click(&self, element: &Element, timeout: Duration) -> Result<(), AppError> {
        within(timeout, "Click", element.click()).await?;
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, AppError> {
        let result = self
            .page
            .evaluate(expression)
            .await
            .map_err(cdp_error("Script evaluation"))?;
        // `undefined` results carry no value.
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn current_url(&self) -> Result<String, AppError> {
        let url = self.page.url().await.map_err(cdp_error("Reading URL"))?;
        Ok(url.unwrap_or_default())
    }

    async fn go_back(&self, timeout: Duration) -> Result<(), AppError> {
        self.evaluate("history.back()").await?;
        within(timeout, "Back navigation", self.page.wait_for_navigation()).await?;
        Ok(())
    }

    async fn content(&self) -> Result<String, AppError> {
        self.page.content().await.map_err(cdp_error("Reading content"))
    }
}
