use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{clip_chars, selector, visible_text};
use crate::models::PageMeta;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static CONTENT_ROOT: LazyLock<Selector> = LazyLock::new(|| selector("main, article"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| selector(r#"link[rel~="canonical"]"#));

const PARAGRAPH_SCAN_LIMIT: usize = 10;
const MIN_PARAGRAPH_CHARS: usize = 100;
const MIN_PARAGRAPH_WORDS: usize = 15;
const MAX_DESCRIPTION_CHARS: usize = 400;

/// Derive page metadata through ordered fallback chains.
///
/// Each lookup runs only when the previous one found nothing; a missing node
/// or attribute simply falls through to the next step.
pub fn extract_meta(document: &Html) -> PageMeta {
    let title = title_text(document).or_else(|| meta_content(document, &OG_TITLE));

    let description = meta_content(document, &DESCRIPTION)
        .or_else(|| meta_content(document, &OG_DESCRIPTION))
        .or_else(|| first_substantial_paragraph(document));

    let language = document
        .root_element()
        .value()
        .attr("lang")
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string);

    let canonical = document
        .select(&CANONICAL)
        .find_map(|link| non_empty(link.value().attr("href")));

    let defaults = PageMeta::default();
    PageMeta {
        title: title.unwrap_or(defaults.title),
        description: description.unwrap_or(defaults.description),
        language: language.unwrap_or(defaults.language),
        canonical,
    }
}

fn title_text(document: &Html) -> Option<String> {
    let title = document.select(&TITLE).next()?;
    let text = title.text().collect::<String>();
    non_empty(Some(text.trim()))
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .find_map(|tag| non_empty(tag.value().attr("content")))
}

/// First of the leading paragraphs long enough to stand in for a description.
fn first_substantial_paragraph(document: &Html) -> Option<String> {
    let root: ElementRef<'_> = document
        .select(&CONTENT_ROOT)
        .next()
        .or_else(|| document.select(&BODY).next())?;

    root.select(&PARAGRAPH)
        .take(PARAGRAPH_SCAN_LIMIT)
        .map(visible_text)
        .find(|text| {
            text.chars().count() > MIN_PARAGRAPH_CHARS
                && text.split_whitespace().count() > MIN_PARAGRAPH_WORDS
        })
        .map(|text| clip_chars(&text, MAX_DESCRIPTION_CHARS))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
