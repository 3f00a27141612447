use url::Url;

use crate::error::AppError;

/// Validate a user-supplied scrape target.
///
/// Only absolute `http`/`https` URLs are accepted.
/// Example: `"https://example.com/pricing"` → `Ok(Url)`, `"ftp://x"` → `Err(InvalidUrl)`
pub fn parse_target_url(raw: &str) -> Result<Url, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidUrl("URL must not be empty".to_string()));
    }
    let url = Url::parse(raw).map_err(|e| AppError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(AppError::InvalidUrl(format!("{raw}: missing host"))),
        scheme => Err(AppError::InvalidUrl(format!(
            "{raw}: unsupported scheme '{scheme}'"
        ))),
    }
}
