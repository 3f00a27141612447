use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::selector;

/// Cookie banners, consent dialogs and modal overlays.
static NOISE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        r#"[id*="cookie"], [class*="cookie"], [id*="consent"], [class*="consent"],
           [role="dialog"], [aria-modal="true"], .modal, .popup, [id*="advertisement"]"#,
    )
});

static ANY_ELEMENT: LazyLock<Selector> = LazyLock::new(|| selector("*"));

/// Document roots that are never removed, whatever classes they carry.
const PROTECTED_TAGS: &[&str] = &["html", "body"];

/// Remove known-noise subtrees from the document in place.
///
/// Matches are collected first and detached afterwards; detaching a node that
/// already sits inside a removed subtree is harmless.
pub fn remove_noise(document: &mut Html) {
    let doomed: Vec<_> = document
        .select(&ANY_ELEMENT)
        .filter(|el| !PROTECTED_TAGS.contains(&el.value().name()))
        .filter(|el| NOISE_SELECTOR.matches(el) || is_ad(*el))
        .map(|el| el.id())
        .collect();

    if !doomed.is_empty() {
        tracing::debug!(count = doomed.len(), "Removing noise elements");
    }

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Ad containers (class tokens like `ad-slot`, `ads-top`, `advertising`) and ad iframes.
fn is_ad(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value
        .classes()
        .map(str::to_lowercase)
        .any(|class| class.starts_with("ad-") || class.starts_with("ads-") || class.contains("advert"))
    {
        return true;
    }
    value.name() == "iframe" && value.attr("src").is_some_and(|src| src.contains("ads"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(html: &str) -> String {
        let mut doc = Html::parse_document(html);
        remove_noise(&mut doc);
        doc.root_element().html()
    }

    #[test]
    fn test_removes_cookie_and_consent_banners() {
        let out = cleaned(
            r#"<body><div id="cookie-banner">Accept cookies</div>
               <div class="gdpr-consent">We value privacy</div>
               <p>Keep me</p></body>"#,
        );
        assert!(!out.contains("Accept cookies"));
        assert!(!out.contains("We value privacy"));
        assert!(out.contains("Keep me"));
    }

    #[test]
    fn test_removes_dialogs_and_modals() {
        let out = cleaned(
            r#"<body><div role="dialog">Dialog</div><div aria-modal="true">Aria modal</div>
               <div class="modal">Modal</div><div class="popup">Popup</div><main>Main</main></body>"#,
        );
        for gone in ["Dialog", "Aria modal", "Modal", "Popup"] {
            assert!(!out.contains(&format!(">{gone}<")), "{gone} should be removed");
        }
        assert!(out.contains("Main"));
    }

    #[test]
    fn test_removes_ads() {
        let out = cleaned(
            r#"<body><div class="ad-slot">Buy now</div>
               <aside id="advertisement-top">Sponsored</aside>
               <iframe src="https://googleads.example/frame"></iframe>
               <iframe src="https://player.example/video"></iframe></body>"#,
        );
        assert!(!out.contains("Buy now"));
        assert!(!out.contains("Sponsored"));
        assert!(!out.contains("googleads"));
        assert!(out.contains("player.example"));
    }

    #[test]
    fn test_keeps_lookalike_classes() {
        let out = cleaned(
            r#"<body><header class="masthead-inner">Masthead</header>
               <button class="load-more">Load</button></body>"#,
        );
        assert!(out.contains("Masthead"));
        assert!(out.contains("Load"));
    }

    #[test]
    fn test_never_removes_body() {
        let out = cleaned(r#"<body class="cookie-consent-given"><main>Content</main></body>"#);
        assert!(out.contains("Content"));
    }

    #[test]
    fn test_nested_noise_is_removed_once() {
        let out = cleaned(
            r#"<body><div class="modal"><div class="cookie">Inner</div></div><p>Rest</p></body>"#,
        );
        assert!(!out.contains("Inner"));
        assert!(out.contains("Rest"));
    }
}
