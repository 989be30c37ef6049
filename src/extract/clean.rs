//! Page cleaning: markdown conversion, chrome removal, text extraction

use pulldown_cmark::{html, Options, Parser};
use scraper::node::Element;
use scraper::Html;

/// ARIA roles of page chrome
const CHROME_ROLES: &[&str] = &["navigation", "banner", "contentinfo"];

/// Class-name fragments of page chrome (case-sensitive substring match)
const CHROME_CLASS_FRAGMENTS: &[&str] = &[
    "nav",
    "navbar",
    "menu",
    "footer",
    "header",
    "breadcrumbs",
    "sub-nav",
    "sidebar",
    "site-header",
    "site-footer",
];

/// Column width handed to the text renderer
const TEXT_WIDTH: usize = 120;

/// Renders Markdown to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    rendered
}

fn is_chrome(element: &Element) -> bool {
    if let Some(role) = element.attr("role") {
        if CHROME_ROLES.contains(&role) {
            return true;
        }
    }
    match element.attr("class") {
        Some(class) => CHROME_CLASS_FRAGMENTS.iter().any(|f| class.contains(f)),
        None => false,
    }
}

/// Detaches navigation, banner, footer and similar chrome from the tree
///
/// Returns the number of elements removed (nested matches included).
pub fn strip_chrome(document: &mut Html) -> usize {
    let doomed: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| node.value().as_element().map_or(false, is_chrome))
        .map(|node| node.id())
        .collect();

    let mut removed = 0;
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}

/// Renders the (cleaned) document as readable plain text, tables included
///
/// Falls back to an empty string if the renderer rejects the markup.
pub fn extract_text(document: &Html) -> String {
    let markup = document.html();
    match html2text::from_read(markup.as_bytes(), TEXT_WIDTH) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::debug!("Text extraction failed: {}", e);
            String::new()
        }
    }
}
