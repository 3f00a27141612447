use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page-level metadata derived from the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub language: String,
    pub canonical: Option<String>,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            language: "en".to_string(),
            canonical: None,
        }
    }
}

/// Semantic category assigned to a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Nav,
    Header,
    Footer,
    Aside,
    Hero,
    List,
    Pricing,
    Faq,
    Grid,
    Section,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Nav => "nav",
            SectionType::Header => "header",
            SectionType::Footer => "footer",
            SectionType::Aside => "aside",
            SectionType::Hero => "hero",
            SectionType::List => "list",
            SectionType::Pricing => "pricing",
            SectionType::Faq => "faq",
            SectionType::Grid => "grid",
            SectionType::Section => "section",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// Structured content pulled out of a single section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub headings: Vec<String>,
    /// Visible text, at most [`MAX_TEXT_CHARS`](crate::extract::MAX_TEXT_CHARS) characters.
    pub text: String,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub lists: Vec<Vec<String>>,
    pub tables: Vec<Vec<Vec<String>>>,
}

/// A classified, labeled content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// `"<type>-<ordinal>"`, unique within one extraction pass.
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub label: String,
    pub source_url: String,
    pub content: SectionContent,
    pub raw_html: String,
    /// True when `raw_html` was clipped.
    pub truncated: bool,
}

/// What the interaction engine did to the live page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLog {
    pub clicks: Vec<String>,
    pub scrolls: u32,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPhase {
    Fetch,
    Render,
}

/// A non-fatal failure recorded during a scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeError {
    pub message: String,
    pub phase: ErrorPhase,
}

impl ScrapeError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: ErrorPhase::Fetch,
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: ErrorPhase::Render,
        }
    }
}

/// Final output of one scrape invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub meta: PageMeta,
    pub sections: Vec<Section>,
    pub interactions: InteractionLog,
    pub errors: Vec<ScrapeError>,
}

impl ScrapeResult {
    /// An empty result carrying only defaults, used as the starting point of a scrape.
    pub fn empty(url: &str, scraped_at: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            scraped_at,
            meta: PageMeta::default(),
            sections: Vec::new(),
            interactions: InteractionLog::default(),
            errors: Vec::new(),
        }
    }
}

/// Markup as returned by the rendering collaborator, plus what was done to reveal it.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub html: String,
    pub interactions: InteractionLog,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_defaults() {
        let meta = PageMeta::default();
        assert_eq!(meta.language, "en");
        assert!(meta.title.is_empty());
        assert!(meta.canonical.is_none());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let mut result = ScrapeResult::empty("https://example.com", Utc::now());
        result.errors.push(ScrapeError::fetch("HTTP 404"));
        result.sections.push(Section {
            id: "nav-0".into(),
            section_type: SectionType::Nav,
            label: "Navigation Menu".into(),
            source_url: "https://example.com".into(),
            content: SectionContent::default(),
            raw_html: "<nav></nav>".into(),
            truncated: false,
        });

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("scrapedAt").is_some());
        assert_eq!(json["errors"][0]["phase"], "fetch");
        assert_eq!(json["errors"][0]["message"], "HTTP 404");
        assert_eq!(json["sections"][0]["type"], "nav");
        assert_eq!(json["sections"][0]["sourceUrl"], "https://example.com");
        assert_eq!(json["sections"][0]["rawHtml"], "<nav></nav>");
        assert_eq!(json["interactions"]["scrolls"], 0);
        assert!(json["meta"]["canonical"].is_null());
    }

    #[test]
    fn test_section_type_display() {
        assert_eq!(SectionType::Pricing.to_string(), "pricing");
        assert_eq!(SectionType::Section.to_string(), "section");
    }
}
