//! Exploratory interactions on a live page.
//!
//! Each sub-step returns its own accumulator and never fails: an error
//! degrades the step to "did nothing" and is logged. [`perform_interactions`]
//! merges the accumulators into one [`InteractionLog`].

use std::collections::HashSet;

use url::Url;

use crate::config::InteractionConfig;
use crate::error::AppError;
use crate::extract::clip_chars;
use crate::models::InteractionLog;
use crate::traits::PageDriver;

const TAB_SELECTOR: &str = r#"[role="tab"][aria-selected="false"]"#;
const NAV_LINK_SELECTOR: &str = r##"nav a[href^="/"], nav a[href^="#"]"##;
const LOAD_MORE_SELECTOR: &str = r##"button, a[href="#"], div[role="button"]"##;
const INTERNAL_LINK_SELECTOR: &str = r#"a[href^="/"], a[href^="."]"#;

const LOAD_MORE_PHRASES: &[&str] = &["load more", "show more", "see more", "view more", "read more"];

const SCROLL_HEIGHT_JS: &str = "document.body.scrollHeight";

/// Run every exploratory step against the page, in a fixed order.
pub async fn perform_interactions<P: PageDriver>(
    page: &P,
    config: &InteractionConfig,
) -> InteractionLog {
    let mut log = InteractionLog {
        scrolls: scroll_to_bottom(page, config).await,
        ..InteractionLog::default()
    };
    tracing::info!(scrolls = log.scrolls, "Completed scrolling");

    let tab_clicks = click_tabs(page, config).await;
    tracing::info!(clicks = tab_clicks.len(), "Completed tab clicks");
    log.clicks.extend(tab_clicks);

    log.clicks.extend(click_load_more(page, config).await);

    if log.clicks.len() < 2 && log.pages.len() < 2 {
        log.pages = follow_pagination(page, config).await;
        tracing::info!(pages = log.pages.len(), "Visited pages");
    }

    log
}

/// Click unselected tabs; fall back to a couple of nav links when there are none.
pub async fn click_tabs<P: PageDriver>(page: &P, config: &InteractionConfig) -> Vec<String> {
    let mut clicks = Vec::new();

    match page.query_all(TAB_SELECTOR).await {
        Ok(tabs) => {
            for (i, tab) in tabs.iter().take(config.max_tabs).enumerate() {
                let text = page
                    .text(tab)
                    .await
                    .ok()
                    .flatten()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| format!("tab-{i}"));
                match page.click(tab, config.tab_click_timeout).await {
                    Ok(()) => {
                        page.wait(config.click_pause).await;
                        clicks.push(format!(r#"[role="tab"]:{text}"#));
                    }
                    Err(e) => tracing::debug!("Failed to click tab: {e}"),
                }
            }
        }
        Err(e) => tracing::debug!("Tab lookup failed: {e}"),
    }

    if clicks.is_empty() {
        clicks = click_nav_links(page, config).await;
    }
    clicks
}

async fn click_nav_links<P: PageDriver>(page: &P, config: &InteractionConfig) -> Vec<String> {
    let mut clicks = Vec::new();
    let links = match page.query_all(NAV_LINK_SELECTOR).await {
        Ok(links) => links,
        Err(e) => {
            tracing::debug!("Nav link lookup failed: {e}");
            return clicks;
        }
    };

    for link in links.iter().take(config.max_nav_link_candidates) {
        let Ok(Some(href)) = page.attribute(link, "href").await else {
            continue;
        };
        let has_text = page
            .text(link)
            .await
            .ok()
            .flatten()
            .is_some_and(|t| !t.trim().is_empty());
        if !has_text || href.ends_with('#') {
            continue;
        }
        if let Err(e) = page.click(link, config.nav_click_timeout).await {
            tracing::debug!("Failed to click nav link {href}: {e}");
            continue;
        }
        page.wait(config.click_pause).await;
        clicks.push(format!(r#"nav a[href="{}"]"#, clip_chars(&href, 50)));
        if clicks.len() >= config.max_nav_link_clicks {
            break;
        }
    }
    clicks
}

/// Click "load more"-style controls among the first few clickable elements.
pub async fn click_load_more<P: PageDriver>(page: &P, config: &InteractionConfig) -> Vec<String> {
    let mut clicks = Vec::new();
    let buttons = match page.query_all(LOAD_MORE_SELECTOR).await {
        Ok(buttons) => buttons,
        Err(e) => {
            tracing::debug!("Load-more lookup failed: {e}");
            return clicks;
        }
    };

    for button in buttons.iter().take(config.max_load_more_candidates) {
        let text = page
            .text(button)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if !LOAD_MORE_PHRASES.iter().any(|phrase| text.contains(phrase)) {
            continue;
        }
        if let Err(e) = page.click(button, config.load_more_timeout).await {
            tracing::debug!("Failed to click load more: {e}");
            continue;
        }
        page.wait(config.load_more_pause).await;
        clicks.push(format!("load-more:{}", clip_chars(&text, 30)));
        if clicks.len() >= config.max_load_more_clicks {
            break;
        }
    }
    clicks
}

/// Scroll one viewport at a time until the document stops growing.
///
/// Returns the number of steps taken, never less than the configured minimum.
pub async fn scroll_to_bottom<P: PageDriver>(page: &P, config: &InteractionConfig) -> u32 {
    let steps = match scroll_steps(page, config).await {
        Ok(steps) => steps,
        Err((steps, e)) => {
            tracing::debug!("Infinite scroll stopped after {steps} steps: {e}");
            steps
        }
    };
    steps.max(config.min_scrolls)
}

async fn scroll_steps<P: PageDriver>(
    page: &P,
    config: &InteractionConfig,
) -> Result<u32, (u32, AppError)> {
    let mut steps = 0;
    let mut last_height = scroll_height(page).await.map_err(|e| (steps, e))?;

    while steps < config.max_scrolls {
        let position = u64::from(config.viewport_height) * u64::from(steps + 1);
        page.evaluate(&format!("window.scrollTo(0, {position})"))
            .await
            .map_err(|e| (steps, e))?;
        page.wait(config.scroll_pause).await;
        steps += 1;

        let height = scroll_height(page).await.map_err(|e| (steps, e))?;
        if steps >= config.min_scrolls && height <= last_height {
            break;
        }
        last_height = height;
    }
    Ok(steps)
}

async fn scroll_height<P: PageDriver>(page: &P) -> Result<f64, AppError> {
    let value = page.evaluate(SCROLL_HEIGHT_JS).await?;
    value
        .as_f64()
        .ok_or_else(|| AppError::BrowserError(format!("scrollHeight is not a number: {value}")))
}

/// Visit a handful of same-site links and record the distinct URLs reached.
///
/// Hrefs are collected up front because element handles go stale once the
/// page navigates away.
pub async fn follow_pagination<P: PageDriver>(page: &P, config: &InteractionConfig) -> Vec<String> {
    let mut pages = Vec::new();
    let start_url = match page.current_url().await {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Pagination skipped, current URL unavailable: {e}");
            return pages;
        }
    };
    let targets = pagination_targets(page, config, &start_url).await;

    let mut visited: HashSet<String> = HashSet::from([start_url.clone()]);
    for target in targets {
        if pages.len() >= config.max_pages {
            break;
        }
        if visited.contains(&target) {
            continue;
        }
        match visit(page, config, &target).await {
            Ok(reached) => {
                let moved = reached != start_url;
                if moved && visited.insert(reached.clone()) {
                    pages.push(reached);
                    page.wait(config.page_pause).await;
                }
                if moved && let Err(e) = return_to_start(page, config).await {
                    tracing::debug!("Failed to return to start page: {e}");
                }
            }
            Err(e) => {
                tracing::debug!("Link navigation to {target} failed: {e}");
                recover_start(page, config, &start_url).await;
            }
        }
    }
    pages
}

async fn pagination_targets<P: PageDriver>(
    page: &P,
    config: &InteractionConfig,
    start_url: &str,
) -> Vec<String> {
    let links = match page.query_all(INTERNAL_LINK_SELECTOR).await {
        Ok(links) => links,
        Err(e) => {
            tracing::debug!("Internal link lookup failed: {e}");
            return Vec::new();
        }
    };
    let Ok(base) = Url::parse(start_url) else {
        return Vec::new();
    };

    let mut targets = Vec::new();
    for link in links.iter().take(config.max_pagination_candidates) {
        let Ok(Some(href)) = page.attribute(link, "href").await else {
            continue;
        };
        let long_enough = page
            .text(link)
            .await
            .ok()
            .flatten()
            .is_some_and(|t| t.trim().chars().count() > 3);
        if !long_enough || href.starts_with("//") {
            continue;
        }
        if let Ok(target) = base.join(&href) {
            targets.push(target.to_string());
        }
    }
    targets
}

async fn visit<P: PageDriver>(
    page: &P,
    config: &InteractionConfig,
    target: &str,
) -> Result<String, AppError> {
    page.goto(target, config.page_load_timeout).await?;
    page.wait_for_dom_ready(config.page_load_timeout).await?;
    page.current_url().await
}

/// Go back after a failed navigation, but only if the page actually left.
async fn recover_start<P: PageDriver>(page: &P, config: &InteractionConfig, start_url: &str) {
    match page.current_url().await {
        Ok(url) if url == start_url => {}
        Ok(_) => {
            if let Err(e) = page.go_back(config.recovery_back_timeout).await {
                tracing::debug!("Recovery back navigation failed: {e}");
            }
        }
        Err(e) => tracing::debug!("Current URL unavailable after failed navigation: {e}"),
    }
}

async fn return_to_start<P: PageDriver>(
    page: &P,
    config: &InteractionConfig,
) -> Result<(), AppError> {
    page.go_back(config.back_timeout).await?;
    page.wait_for_dom_ready(config.back_timeout).await
}
