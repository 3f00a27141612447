//! Section extraction pipeline.
//!
//! Raw markup flows through [`noise`] → [`segment`] → [`classify`] →
//! [`label`] → [`content`], with [`meta`] deriving page-level metadata from the
//! same document. Everything here is synchronous and infallible: a lookup that
//! finds nothing yields an empty value, never an error.

pub mod classify;
pub mod content;
pub mod label;
pub mod meta;
pub mod noise;
pub mod segment;

use scraper::{ElementRef, Selector};

pub use classify::detect_section_type;
pub use content::{extract_content, raw_html};
pub use label::generate_label;
pub use meta::extract_meta;
pub use noise::remove_noise;
pub use segment::{ParsedPage, needs_rendering, parse_page, parse_sections};

/// Blocks with less visible text than this are never promoted to sections.
pub const MIN_SECTION_TEXT_CHARS: usize = 50;
/// Upper bound of [`SectionContent::text`](crate::models::SectionContent::text).
pub const MAX_TEXT_CHARS: usize = 2000;
/// Upper bound of [`Section::raw_html`](crate::models::Section::raw_html).
pub const MAX_RAW_HTML_CHARS: usize = 5000;

const ELLIPSIS: &str = "...";

/// Elements whose text never reaches the reader.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Parse a selector known at compile time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Visible text of a subtree: text nodes outside script/style, whitespace-normalized.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| INVISIBLE_TAGS.contains(&el.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

/// Hard length cutoff in characters, with an ellipsis marker when clipped.
///
/// The returned string never exceeds `max` characters. The flag reports
/// whether anything was cut.
pub fn clip_with_ellipsis(value: &str, max: usize) -> (String, bool) {
    if value.chars().count() <= max {
        return (value.to_string(), false);
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut clipped: String = value.chars().take(keep).collect();
    clipped.push_str(ELLIPSIS);
    (clipped, true)
}

/// First `max` characters of `value`.
pub(crate) fn clip_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Upper-case the first character and lower-case the rest.
pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Space-joined class attribute, lower-cased.
pub(crate) fn class_string(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("class")
        .unwrap_or_default()
        .to_lowercase()
}
