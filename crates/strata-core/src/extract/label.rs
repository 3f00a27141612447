use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::{capitalize, clip_chars, selector, visible_text};
use crate::models::SectionType;

pub const MAX_LABEL_CHARS: usize = 50;

/// Navigation chrome that never makes a meaningful label.
const BOILERPLATE_PHRASES: &[&str] = &[
    "skip to content",
    "skip to",
    "jump to",
    "move to sidebar",
    "hide",
    "main menu",
    "toggle",
    "navigation menu",
    "search documentation",
    "getting started",
    "contents",
    "[edit]",
    "(edit)",
    "edit source",
    "menu",
    "search",
    "documentation",
];

static LABEL_HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2, h3"));
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]|\(.*?\)").expect("valid bracket regex"));

const MAX_HEADING_WORDS: usize = 8;
const KEPT_HEADING_WORDS: usize = 5;
const MAX_TEXT_WORDS: usize = 6;

type Strategy = fn(ElementRef<'_>) -> Option<String>;

const STRATEGIES: &[Strategy] = &[from_heading, from_aria_label, from_text];

/// Short human-readable label for a block, at most 50 characters.
pub fn generate_label(element: ElementRef<'_>, section_type: SectionType) -> String {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(element))
        .unwrap_or_else(|| fallback_label(section_type).to_string())
}

fn from_heading(element: ElementRef<'_>) -> Option<String> {
    let heading = element.select(&LABEL_HEADING).next()?;
    let mut cleaned = visible_text(heading).to_lowercase();
    for phrase in BOILERPLATE_PHRASES {
        cleaned = cleaned.replace(phrase, "");
    }
    let cleaned = BRACKETED.replace_all(&cleaned, "");

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_HEADING_WORDS {
        return None;
    }
    let label = words[..words.len().min(KEPT_HEADING_WORDS)].join(" ");
    (label.chars().count() > 2).then(|| clip_chars(&capitalize(&label), MAX_LABEL_CHARS))
}

fn from_aria_label(element: ElementRef<'_>) -> Option<String> {
    let aria = element.value().attr("aria-label")?.trim();
    let len = aria.chars().count();
    (len > 2 && len < 60).then(|| clip_chars(&capitalize(aria), MAX_LABEL_CHARS))
}

/// Greedy walk over the block's words, preferring capitalized ones.
fn from_text(element: ElementRef<'_>) -> Option<String> {
    let text = visible_text(element);
    let mut kept: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        if word.chars().count() < 2 || is_boilerplate_word(word) {
            continue;
        }
        if kept.is_empty() || word.chars().next().is_some_and(char::is_uppercase) {
            kept.push(word);
        }
        if kept.len() >= MAX_TEXT_WORDS {
            break;
        }
    }
    if kept.is_empty() {
        return None;
    }
    Some(clip_chars(&kept.join(" "), MAX_LABEL_CHARS).trim().to_string())
}

/// A word belongs to the boilerplate list if it contains a phrase or is part of one.
fn is_boilerplate_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    BOILERPLATE_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase) || phrase.contains(lower.as_str()))
}

fn fallback_label(section_type: SectionType) -> &'static str {
    match section_type {
        SectionType::Nav => "Navigation Menu",
        SectionType::Header => "Page Header",
        SectionType::Footer => "Page Footer",
        SectionType::Hero => "Hero Section",
        SectionType::Aside => "Sidebar Content",
        _ => "Content Section",
    }
}
