use std::time::Duration;

use crate::error::AppError;

/// Desktop browser user agent sent by both fetch strategies.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for the static HTTP fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DESKTOP_USER_AGENT.to_string(),
        }
    }
}

/// Limits and waits used by the interaction engine.
#[derive(Debug, Clone)]
pub struct InteractionConfig {
    pub max_tabs: usize,
    pub tab_click_timeout: Duration,
    /// Nav-link candidates scanned when no tab could be clicked.
    pub max_nav_link_candidates: usize,
    pub max_nav_link_clicks: usize,
    pub nav_click_timeout: Duration,
    pub click_pause: Duration,

    pub max_load_more_candidates: usize,
    pub max_load_more_clicks: usize,
    pub load_more_timeout: Duration,
    pub load_more_pause: Duration,

    pub min_scrolls: u32,
    pub max_scrolls: u32,
    pub scroll_pause: Duration,
    pub viewport_height: u32,

    pub max_pagination_candidates: usize,
    pub max_pages: usize,
    pub page_load_timeout: Duration,
    pub back_timeout: Duration,
    pub recovery_back_timeout: Duration,
    pub page_pause: Duration,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_tabs: 3,
            tab_click_timeout: Duration::from_secs(3),
            max_nav_link_candidates: 3,
            max_nav_link_clicks: 2,
            nav_click_timeout: Duration::from_secs(2),
            click_pause: Duration::from_millis(500),

            max_load_more_candidates: 5,
            max_load_more_clicks: 2,
            load_more_timeout: Duration::from_secs(3),
            load_more_pause: Duration::from_millis(800),

            min_scrolls: 3,
            max_scrolls: 5,
            scroll_pause: Duration::from_millis(600),
            viewport_height: 1080,

            max_pagination_candidates: 10,
            max_pages: 3,
            page_load_timeout: Duration::from_secs(8),
            back_timeout: Duration::from_secs(5),
            recovery_back_timeout: Duration::from_secs(3),
            page_pause: Duration::from_millis(500),
        }
    }
}

/// Settings for the browser-rendered fetch.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub navigation_timeout: Duration,
    /// Pause between DOM readiness and the first interaction.
    pub settle_delay: Duration,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
    pub interactions: InteractionConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(20),
            settle_delay: Duration::from_secs(1),
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            interactions: InteractionConfig::default(),
        }
    }
}

/// Complete configuration of one scrape.
#[derive(Debug, Clone, Default)]
pub struct ScrapeConfig {
    pub fetch: FetchConfig,
    pub render: RenderConfig,
}

impl ScrapeConfig {
    /// Read configuration from environment variables, falling back to defaults.
    ///
    /// - `STRATA_FETCH_TIMEOUT_SECS` (static fetch timeout, default 10)
    /// - `STRATA_NAV_TIMEOUT_SECS` (rendered navigation timeout, default 20)
    /// - `STRATA_USER_AGENT` (user agent for both strategies)
    /// - `STRATA_VIEWPORT_WIDTH` / `STRATA_VIEWPORT_HEIGHT` (default 1920x1080)
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(secs) = env_positive("STRATA_FETCH_TIMEOUT_SECS")? {
            config.fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_positive("STRATA_NAV_TIMEOUT_SECS")? {
            config.render.navigation_timeout = Duration::from_secs(secs);
        }
        if let Ok(agent) = std::env::var("STRATA_USER_AGENT")
            && !agent.trim().is_empty()
        {
            config.fetch.user_agent = agent.clone();
            config.render.user_agent = agent;
        }
        if let Some(width) = env_positive("STRATA_VIEWPORT_WIDTH")? {
            config.render.viewport_width = to_u32("STRATA_VIEWPORT_WIDTH", width)?;
        }
        if let Some(height) = env_positive("STRATA_VIEWPORT_HEIGHT")? {
            let height = to_u32("STRATA_VIEWPORT_HEIGHT", height)?;
            config.render.viewport_height = height;
            config.render.interactions.viewport_height = height;
        }

        Ok(config)
    }
}

fn env_positive(name: &str) -> Result<Option<u64>, AppError> {
    match std::env::var(name) {
        Err(_) => Ok(None),
        Ok(raw) => parse_positive(name, &raw).map(Some),
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u64, AppError> {
    let parsed: u64 = raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!("Invalid {name} '{raw}': must be a positive integer"))
    })?;
    if parsed == 0 {
        return Err(AppError::ConfigError(format!("{name} must be at least 1")));
    }
    Ok(parsed)
}

fn to_u32(name: &str, value: u64) -> Result<u32, AppError> {
    u32::try_from(value)
        .map_err(|_| AppError::ConfigError(format!("{name} is out of range: {value}")))
}
