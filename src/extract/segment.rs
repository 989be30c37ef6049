//! Heading-anchored segmentation

use crate::extract::{Heading, Section};
use scraper::{ElementRef, Html, Node, Selector};

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Paragraphs considered when a page has no usable headings
const FALLBACK_PARAGRAPHS: usize = 6;

/// Title of the synthetic section when the page has no `<title>`
const FALLBACK_TITLE: &str = "General";

fn is_heading(name: &str) -> bool {
    HEADING_TAGS.contains(&name)
}

fn heading_level(name: &str) -> u8 {
    name.strip_prefix('h')
        .and_then(|digit| digit.parse().ok())
        .unwrap_or(6)
}

fn collapse<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-normalized text of an element
fn element_text(element: ElementRef<'_>) -> String {
    collapse(element.text())
}

fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn first_with_class<'a>(document: &'a Html, tag: &str, fragments: &[&str]) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(tag).ok()?;
    document.select(&selector).find(|element| {
        element
            .value()
            .attr("class")
            .map_or(false, |class| fragments.iter().any(|f| class.contains(f)))
    })
}

/// Picks the element most likely to hold the article body
///
/// `None` means the whole document.
pub fn select_main_root(document: &Html) -> Option<ElementRef<'_>> {
    first_match(document, "main")
        .or_else(|| first_match(document, "article"))
        .or_else(|| first_with_class(document, "div", &["article-body", "post-content", "content"]))
        .or_else(|| first_with_class(document, "section", &["content", "article"]))
}

/// Elements matching `css` under `root`, or the whole document when `root` is `None`
fn select_under<'a>(document: &'a Html, root: Option<ElementRef<'a>>, css: &str) -> Vec<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    match root {
        Some(root) => root.select(&selector).collect(),
        None => document.select(&selector).collect(),
    }
}

/// Text of the siblings after `heading`, up to the next heading
fn section_body(heading: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for sibling in heading.next_siblings() {
        let text = match sibling.value() {
            Node::Element(element) if is_heading(element.name()) => break,
            Node::Element(_) => ElementRef::wrap(sibling).map(element_text),
            Node::Text(text) => Some(collapse(text.split_whitespace())),
            _ => None,
        };
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            parts.push(text);
        }
    }

    parts.join("\n")
}

/// Splits the main root into sections, falling back to leading paragraphs
pub fn segment_sections(document: &Html) -> Vec<Section> {
    let root = select_main_root(document);
    let heading_css = HEADING_TAGS.join(", ");

    let sections: Vec<Section> = select_under(document, root, &heading_css)
        .into_iter()
        .filter_map(|heading| {
            let title = element_text(heading);
            if title.is_empty() {
                return None;
            }
            let body = section_body(heading);
            if body.is_empty() {
                return None;
            }
            Some(Section {
                title,
                body,
                level: heading_level(heading.value().name()),
            })
        })
        .collect();

    if !sections.is_empty() {
        return sections;
    }

    fallback_section(document, root).into_iter().collect()
}

fn fallback_section(document: &Html, root: Option<ElementRef<'_>>) -> Option<Section> {
    let paragraphs: Vec<String> = select_under(document, root, "p")
        .into_iter()
        .take(FALLBACK_PARAGRAPHS)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return None;
    }

    let title = first_match(document, "title")
        .map(element_text)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    Some(Section {
        title,
        body: paragraphs.join("\n"),
        level: 2,
    })
}

/// Heading outline of the whole document, h1 through h5, grouped by level
pub fn heading_outline(document: &Html) -> Vec<Heading> {
    let mut outline = Vec::new();
    for level in 1..=5u8 {
        for heading in select_under(document, None, &format!("h{}", level)) {
            let title = element_text(heading);
            if !title.is_empty() {
                outline.push(Heading { level, title });
            }
        }
    }
    outline
}
