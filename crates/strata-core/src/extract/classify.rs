use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::{class_string, selector, visible_text};
use crate::models::SectionType;

static LISTS: LazyLock<Selector> = LazyLock::new(|| selector("ul, ol"));
static PRICING_CONTAINERS: LazyLock<Selector> = LazyLock::new(|| selector("table, div"));
static PRICING_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"price|pricing|plan").expect("valid pricing regex"));

const CURRENCY_MARKERS: &[&str] = &["$", "usd", "price"];
const QA_MARKERS: &[&str] = &["?", "q:", "a:", "question", "answer"];

/// Facts about a block computed once and shared by every rule.
struct Block<'a> {
    element: ElementRef<'a>,
    tag: &'a str,
    class: String,
    text: String,
}

type Rule = fn(&Block<'_>) -> Option<SectionType>;

/// Ordered cascade; the first rule that answers wins.
const RULES: &[Rule] = &[
    landmark_tag,
    hero_banner,
    list_heavy,
    pricing_table,
    faq_text,
    card_grid,
];

/// Assign a semantic category to a block.
///
/// A pure function of the subtree: identical markup always yields the same type.
pub fn detect_section_type(element: ElementRef<'_>) -> SectionType {
    let block = Block {
        element,
        tag: element.value().name(),
        class: class_string(element),
        text: visible_text(element).to_lowercase(),
    };

    RULES
        .iter()
        .find_map(|rule| rule(&block))
        .unwrap_or(SectionType::Section)
}

fn landmark_tag(block: &Block<'_>) -> Option<SectionType> {
    match block.tag {
        "nav" => Some(SectionType::Nav),
        "footer" => Some(SectionType::Footer),
        "header" => Some(SectionType::Header),
        "aside" => Some(SectionType::Aside),
        _ => None,
    }
}

/// A hero/banner-classed block that opens its page body or `<main>`.
fn hero_banner(block: &Block<'_>) -> Option<SectionType> {
    if !(block.class.contains("hero") || block.class.contains("banner")) {
        return None;
    }
    let container = block
        .element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| matches!(el.value().name(), "body" | "main"))?;

    let first_block = container
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| matches!(child.value().name(), "section" | "div"))?;

    (first_block.id() == block.element.id()).then_some(SectionType::Hero)
}

fn list_heavy(block: &Block<'_>) -> Option<SectionType> {
    (block.element.select(&LISTS).count() > 2).then_some(SectionType::List)
}

fn pricing_table(block: &Block<'_>) -> Option<SectionType> {
    if !CURRENCY_MARKERS.iter().any(|m| block.text.contains(m)) {
        return None;
    }
    block
        .element
        .select(&PRICING_CONTAINERS)
        .any(|el| PRICING_CLASS.is_match(&class_string(el)))
        .then_some(SectionType::Pricing)
}

fn faq_text(block: &Block<'_>) -> Option<SectionType> {
    let hits = QA_MARKERS.iter().filter(|m| block.text.contains(*m)).count();
    (hits >= 2).then_some(SectionType::Faq)
}

fn card_grid(block: &Block<'_>) -> Option<SectionType> {
    let cards = block
        .element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| matches!(child.value().name(), "div" | "article"))
        .count();
    (cards >= 3).then_some(SectionType::Grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn classify(html: &str, css: &str) -> SectionType {
        let doc = Html::parse_document(html);
        let el = doc.select(&selector(css)).next().unwrap();
        detect_section_type(el)
    }

    #[test]
    fn test_landmark_tags() {
        assert_eq!(classify("<nav>x</nav>", "nav"), SectionType::Nav);
        assert_eq!(classify("<footer>x</footer>", "footer"), SectionType::Footer);
        assert_eq!(classify("<header>x</header>", "header"), SectionType::Header);
        assert_eq!(classify("<aside>x</aside>", "aside"), SectionType::Aside);
    }

    #[test]
    fn test_landmark_beats_other_signals() {
        let html = "<nav><ul><li>a</li></ul><ul><li>b</li></ul><ul><li>c</li></ul></nav>";
        assert_eq!(classify(html, "nav"), SectionType::Nav);
    }

    #[test]
    fn test_hero_must_be_first_block() {
        let html = r#"<body><section class="hero"><div>1</div><div>2</div><div>3</div></section>
                      <section class="banner">Second</section></body>"#;
        assert_eq!(classify(html, "section.hero"), SectionType::Hero);
        assert_eq!(classify(html, "section.banner"), SectionType::Section);
    }

    #[test]
    fn test_hero_inside_main() {
        let html = r#"<body><main><div class="page-banner">Big</div><section>Other</section></main></body>"#;
        assert_eq!(classify(html, "div.page-banner"), SectionType::Hero);
    }

    #[test]
    fn test_list_needs_more_than_two_lists() {
        let two = "<section><ul><li>a</li></ul><ol><li>b</li></ol></section>";
        let three = "<section><ul><li>a</li></ul><ol><li>b</li></ol><ul><li>c</li></ul></section>";
        assert_eq!(classify(two, "section"), SectionType::Section);
        assert_eq!(classify(three, "section"), SectionType::List);
    }

    #[test]
    fn test_pricing_needs_currency_and_container() {
        let priced = r#"<section><div class="plan-card">Pro $29/month</div></section>"#;
        let no_container = r#"<section><p>Only $29 today</p></section>"#;
        let no_currency = r#"<section><div class="plan-card">Pro tier</div></section>"#;
        assert_eq!(classify(priced, "section"), SectionType::Pricing);
        assert_eq!(classify(no_container, "section"), SectionType::Section);
        assert_eq!(classify(no_currency, "section"), SectionType::Section);
    }

    #[test]
    fn test_faq_needs_two_markers() {
        let faq = "<section><p>Q: How does it work? A: Quietly.</p></section>";
        let one = "<section><p>Why though?</p></section>";
        assert_eq!(classify(faq, "section"), SectionType::Faq);
        assert_eq!(classify(one, "section"), SectionType::Section);
    }

    #[test]
    fn test_grid_counts_direct_children_only() {
        let grid = "<section><div>a</div><article>b</article><div>c</div></section>";
        let nested = "<section><div><div>a</div><div>b</div><div>c</div></div></section>";
        assert_eq!(classify(grid, "section"), SectionType::Grid);
        assert_eq!(classify(nested, "section"), SectionType::Section);
    }

    #[test]
    fn test_deterministic() {
        let html = "<section><div>a?</div><div>question</div><div>c</div></section>";
        let first = classify(html, "section");
        for _ in 0..5 {
            assert_eq!(classify(html, "section"), first);
        }
        assert_eq!(first, SectionType::Faq);
    }
}
