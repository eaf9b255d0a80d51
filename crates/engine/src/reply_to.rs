//! Reply-to link extraction.
//!
//! Page owners advertise a contact address with `<a rel="reply-to" href="mailto:...">`.

use std::sync::LazyLock;

use scraper::{Html, Selector};

static REPLY_TO_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[rel~="reply-to"]"#).expect("reply-to selector is valid CSS")
});

const MAILTO: &str = "mailto:";

/// Collect the reply-to addresses declared in an HTML document, in document
/// order and without duplicates.
pub fn extract_reply_to(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs: Vec<String> = Vec::new();

    for anchor in document.select(&REPLY_TO_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let address = strip_mailto(href.trim()).trim();
        if address.is_empty() || hrefs.iter().any(|h| h == address) {
            continue;
        }
        hrefs.push(address.to_string());
    }

    hrefs
}

/// Remove a leading `mailto:` (any case); other hrefs are returned as-is.
fn strip_mailto(href: &str) -> &str {
    match href.get(..MAILTO.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(MAILTO) => &href[MAILTO.len()..],
        _ => href,
    }
}
