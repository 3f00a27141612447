use crate::config::RenderConfig;
use crate::error::AppError;
use crate::interact::perform_interactions;
use crate::models::RenderedPage;
use crate::traits::PageDriver;

/// Load `url` in a live page, explore it, and serialize the resulting DOM.
///
/// Only navigation and serialization can fail; interaction problems are
/// absorbed by the interaction engine.
pub async fn render_page<P: PageDriver>(
    page: &P,
    url: &str,
    config: &RenderConfig,
) -> Result<RenderedPage, AppError> {
    tracing::info!("Navigating to {}", url);
    page.goto(url, config.navigation_timeout).await?;
    page.wait_for_dom_ready(config.navigation_timeout).await?;
    page.wait(config.settle_delay).await;

    let interactions = perform_interactions(page, &config.interactions).await;
    let html = page.content().await?;
    tracing::info!(
        bytes = html.len(),
        clicks = interactions.clicks.len(),
        scrolls = interactions.scrolls,
        pages = interactions.pages.len(),
        "Rendered page"
    );

    Ok(RenderedPage { html, interactions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockElement, MockPage};

    #[tokio::test]
    async fn test_render_returns_content_and_interactions() {
        let page = MockPage::new("about:blank")
            .with_content("<html><body><main>Rendered</main></body></html>")
            .with_elements(
                r#"[role="tab"][aria-selected="false"]"#,
                vec![MockElement::new("Specs")],
            );

        let rendered = render_page(&page, "https://acme.test/", &RenderConfig::default())
            .await
            .unwrap();

        assert_eq!(
            rendered.html,
            "<html><body><main>Rendered</main></body></html>"
        );
        assert_eq!(rendered.interactions.clicks, vec![r#"[role="tab"]:Specs"#]);
        assert_eq!(rendered.interactions.scrolls, 3);
        assert_eq!(page.visited()[0], "https://acme.test/");
    }

    #[tokio::test]
    async fn test_navigation_timeout_fails_without_interactions() {
        let page = MockPage::new("about:blank")
            .with_failing_navigation("https://slow.test/")
            .with_elements(
                r#"[role="tab"][aria-selected="false"]"#,
                vec![MockElement::new("Never")],
            );

        let err = render_page(&page, "https://slow.test/", &RenderConfig::default())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timed out after 20 seconds");
        assert!(page.clicked().is_empty());
    }

    #[tokio::test]
    async fn test_failed_pagination_link_keeps_page_on_target() {
        let page = MockPage::new("about:blank")
            .with_elements(
                r#"a[href^="/"], a[href^="."]"#,
                vec![
                    MockElement::new("Broken link").attr("href", "/broken"),
                    MockElement::new("Working link").attr("href", "/ok"),
                ],
            )
            .with_failing_navigation("https://acme.test/broken");

        let rendered = render_page(&page, "https://acme.test/", &RenderConfig::default())
            .await
            .unwrap();

        assert_eq!(rendered.interactions.pages, vec!["https://acme.test/ok"]);
        assert_eq!(page.current_url().await.unwrap(), "https://acme.test/");
    }
}
