use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{
    MIN_SECTION_TEXT_CHARS, detect_section_type, extract_content, extract_meta, generate_label,
    raw_html, remove_noise, selector, visible_text,
};
use crate::models::{PageMeta, Section};

static SEMANTIC_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| selector("header, nav, main, section, article, aside, footer"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));

/// Markers left in the static markup by client-side frameworks.
const SPA_INDICATORS: &[&str] = &[
    r#"<div id="root""#,
    r#"<div id="app""#,
    "ng-version=",
    "data-reactroot",
];
const MIN_STATIC_SECTIONS: usize = 2;
const MIN_STATIC_TEXT_CHARS: usize = 200;

/// Everything derived from one fetch attempt's markup.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub meta: PageMeta,
    pub sections: Vec<Section>,
}

/// Parse markup once and derive both metadata and sections from it.
///
/// Metadata is read before noise removal so that head tags inside removed
/// containers are still seen.
pub fn parse_page(html: &str, base: &Url) -> ParsedPage {
    let mut document = Html::parse_document(html);
    let meta = extract_meta(&document);
    remove_noise(&mut document);
    let sections = segment(&document, base);
    ParsedPage { meta, sections }
}

/// Partition markup into classified, labeled sections.
pub fn parse_sections(html: &str, base: &Url) -> Vec<Section> {
    let mut document = Html::parse_document(html);
    remove_noise(&mut document);
    segment(&document, base)
}

fn segment(document: &Html, base: &Url) -> Vec<Section> {
    let mut candidates: Vec<ElementRef<'_>> = document.select(&SEMANTIC_BLOCKS).collect();
    if candidates.is_empty() {
        candidates = body_blocks(document);
        tracing::debug!(
            count = candidates.len(),
            "No semantic blocks, falling back to body children"
        );
    }

    let mut sections = Vec::new();
    let mut ordinal = 0usize;
    for element in candidates {
        if visible_text(element).chars().count() < MIN_SECTION_TEXT_CHARS {
            continue;
        }
        let section_type = detect_section_type(element);
        let (raw_html, truncated) = raw_html(element);
        sections.push(Section {
            id: format!("{section_type}-{ordinal}"),
            section_type,
            label: generate_label(element, section_type),
            source_url: base.to_string(),
            content: extract_content(element, base),
            raw_html,
            truncated,
        });
        ordinal += 1;
    }
    sections
}

/// Direct `div` children of `<body>`.
fn body_blocks(document: &Html) -> Vec<ElementRef<'_>> {
    document
        .select(&BODY)
        .next()
        .map(|body| {
            body.children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "div")
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the static markup looks like it needs client-side rendering.
///
/// Diagnostic only: the orchestrator always attempts the rendered fetch.
pub fn needs_rendering(html: &str, sections: &[Section]) -> bool {
    if sections.len() < MIN_STATIC_SECTIONS {
        return true;
    }
    let total_text: usize = sections
        .iter()
        .map(|s| s.content.text.chars().count())
        .sum();
    if total_text < MIN_STATIC_TEXT_CHARS {
        return true;
    }
    SPA_INDICATORS.iter().any(|marker| html.contains(marker))
}
