//! Content extraction
//!
//! Turns one fetched document into [`PageContent`]:
//! 1. Markdown bodies are rendered to HTML
//! 2. Navigation, banners, footers and similar chrome are removed
//! 3. The remaining page is rendered to plain text
//! 4. The heading outline is collected
//! 5. The main content root is split into heading-anchored [`Section`]s
//!
//! Extraction never fails. Markup the parser cannot make sense of simply
//! produces fewer (or no) sections.

mod clean;
mod segment;

pub use clean::{extract_text, markdown_to_html, strip_chrome};
pub use segment::{heading_outline, segment_sections, select_main_root};

use scraper::Html;
use serde::Serialize;

/// A heading and the text that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: String,
    /// Heading level, 1 through 6
    pub level: u8,
}

/// One entry of a page's heading outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub title: String,
}

/// Everything extracted from one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContent {
    pub url: String,
    /// Readable text of the cleaned page
    pub text: String,
    /// h1–h5 headings, grouped by level
    pub headings: Vec<Heading>,
    /// Sections in document order
    pub sections: Vec<Section>,
}

/// Whether a document should be treated as Markdown
pub fn is_markdown(url: &str, content_type: Option<&str>) -> bool {
    content_type.map_or(false, |ct| ct.contains("text/markdown"))
        || url.to_lowercase().ends_with(".md")
}

/// Extracts text, outline and sections from a fetched document
///
/// # Example
///
/// ```
/// use pulse_extractor::extract_page_content;
///
/// let content = extract_page_content(
///     "https://docs.example.com/billing",
///     "<main><h1>Billing</h1><p>Pay monthly.</p></main>",
///     Some("text/html"),
/// );
/// assert_eq!(content.sections[0].title, "Billing");
/// ```
pub fn extract_page_content(url: &str, body: &str, content_type: Option<&str>) -> PageContent {
    let markup = if is_markdown(url, content_type) {
        markdown_to_html(body)
    } else {
        body.to_string()
    };

    let mut document = Html::parse_document(&markup);
    let removed = strip_chrome(&mut document);
    tracing::trace!("Removed {} chrome elements from {}", removed, url);

    let content = PageContent {
        url: url.to_string(),
        text: extract_text(&document),
        headings: heading_outline(&document),
        sections: segment_sections(&document),
    };

    tracing::debug!(
        "Extracted {} sections and {} headings from {}",
        content.sections.len(),
        content.headings.len(),
        url
    );
    content
}
