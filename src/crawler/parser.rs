//! Link discovery
//!
//! Pulls `<a href>` targets out of a fetched page and keeps only those worth
//! crawling: relevant by [`is_relevant_link`], resolvable against the page
//! URL, http(s), and on the same domain as the page.

use crate::url::{is_relevant_link, normalize_url, DomainKey};
use scraper::{Html, Selector};
use url::Url;

/// Extracts same-domain, relevant links from an HTML page
///
/// Links are resolved against `base`, normalized (fragment removed), and
/// returned in document order. Duplicates within the page are kept; the
/// scheduler's visited set takes care of them.
///
/// # Example
///
/// ```
/// use pulse_extractor::crawler::discover_links;
/// use pulse_extractor::url::DomainKey;
/// use url::Url;
///
/// let base = Url::parse("https://docs.example.com/start").unwrap();
/// let domain = DomainKey::from_url(&base).unwrap();
/// let html = r#"<a href="/guide">Guide</a><a href="https://other.com/help">Other</a>"#;
///
/// let links = discover_links(html, &base, &domain);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://docs.example.com/guide");
/// ```
pub fn discover_links(html: &str, base: &Url, domain: &DomainKey) -> Vec<Url> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| is_relevant_link(href))
        .filter_map(|href| resolve_link(href, base))
        .filter(|url| DomainKey::from_url(url).as_ref() == Some(domain))
        .collect()
}

/// Resolves an href against the page URL, keeping only http(s) results
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let joined = base.join(href.trim()).ok()?;
    normalize_url(joined.as_str())
}
