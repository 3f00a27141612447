use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use url::Url;

use super::{MAX_RAW_HTML_CHARS, MAX_TEXT_CHARS, clip_with_ellipsis, selector, visible_text};
use crate::models::{Image, Link, SectionContent};

static HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2, h3, h4, h5, h6"));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static LISTS: LazyLock<Selector> = LazyLock::new(|| selector("ul, ol"));
static TABLES: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROWS: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELLS: LazyLock<Selector> = LazyLock::new(|| selector("td, th"));

/// Link schemes that never point at content.
const EXCLUDED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:"];

/// Pull headings, links, images, lists, tables and bounded text out of a block.
pub fn extract_content(element: ElementRef<'_>, base: &Url) -> SectionContent {
    let (text, _) = clip_with_ellipsis(&visible_text(element), MAX_TEXT_CHARS);
    SectionContent {
        headings: extract_headings(element),
        text,
        links: extract_links(element, base),
        images: extract_images(element, base),
        lists: extract_lists(element),
        tables: extract_tables(element),
    }
}

/// Serialized markup of the block, clipped to 5000 characters.
///
/// The flag is true iff the serialized block was longer than the bound.
pub fn raw_html(element: ElementRef<'_>) -> (String, bool) {
    clip_with_ellipsis(&element.html(), MAX_RAW_HTML_CHARS)
}

pub fn extract_headings(element: ElementRef<'_>) -> Vec<String> {
    element
        .select(&HEADINGS)
        .map(visible_text)
        .filter(|text| !text.is_empty())
        .collect()
}

pub fn extract_links(element: ElementRef<'_>, base: &Url) -> Vec<Link> {
    element
        .select(&ANCHORS)
        .filter_map(|anchor| {
            let href = resolve_href(anchor.value().attr("href")?, base)?;
            Some(Link {
                text: visible_text(anchor),
                href,
            })
        })
        .collect()
}

pub fn extract_images(element: ElementRef<'_>, base: &Url) -> Vec<Image> {
    element
        .select(&IMAGES)
        .filter_map(|img| {
            let value = img.value();
            let src = [value.attr("src"), value.attr("data-src")]
                .into_iter()
                .flatten()
                .map(str::trim)
                .find(|src| !src.is_empty())?;
            Some(Image {
                src: base.join(src).ok()?.to_string(),
                alt: value.attr("alt").unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Direct item texts of every list, one inner vector per non-empty list.
pub fn extract_lists(element: ElementRef<'_>) -> Vec<Vec<String>> {
    element
        .select(&LISTS)
        .map(|list| {
            list.children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "li")
                .map(visible_text)
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
        .collect()
}

/// Row-major cell texts of every table, skipping empty rows and empty tables.
pub fn extract_tables(element: ElementRef<'_>) -> Vec<Vec<Vec<String>>> {
    element
        .select(&TABLES)
        .map(|table| {
            table
                .select(&ROWS)
                .map(|row| row.select(&CELLS).map(visible_text).collect::<Vec<_>>())
                .filter(|cells| !cells.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|rows| !rows.is_empty())
        .collect()
}

/// Absolute URL for an href, or `None` for excluded schemes and unresolvable values.
fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if EXCLUDED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }
    let resolved = base.join(href).ok()?;
    let scheme = resolved.scheme();
    if EXCLUDED_SCHEMES
        .iter()
        .any(|excluded| excluded.trim_end_matches(':') == scheme)
    {
        return None;
    }
    Some(resolved.to_string())
}
