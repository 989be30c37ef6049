//! URL handling module for Pulse Extractor
//!
//! This module provides URL normalization, domain-key derivation, and the
//! relevance filter that keeps link discovery on documentation-shaped paths.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{DomainKey, DomainParts};
pub use normalize::normalize_url;

/// Path fragments that mark a link as documentation-shaped
const HELP_PATTERNS: &[&str] = &[
    "help",
    "support",
    "docs",
    "documentation",
    "knowledge",
    "hc/en-us",
];

/// File extensions that are never worth following
const BINARY_EXTENSIONS: &[&str] = &[".pdf", ".zip", ".png", ".jpg", ".jpeg", ".gif"];

/// Decides whether a raw `href` is worth following
///
/// This function applies the following rules in order:
/// 1. Empty, `mailto:` and `tel:` links are rejected
/// 2. Links to common binary/image files are rejected
/// 3. Links mentioning a help/support/docs pattern (case-insensitive) are accepted
/// 4. Any other link is accepted only if it is domain-relative (starts with `/`)
///
/// Same-domain restriction is applied separately, after resolution.
///
/// # Examples
///
/// ```
/// use pulse_extractor::url::is_relevant_link;
///
/// assert!(is_relevant_link("https://example.com/Help/billing"));
/// assert!(is_relevant_link("/pricing"));
/// assert!(!is_relevant_link("pricing"));
/// assert!(!is_relevant_link("/docs/guide.pdf"));
/// assert!(!is_relevant_link("mailto:support@example.com"));
/// ```
pub fn is_relevant_link(href: &str) -> bool {
    let href = href.trim();

    if href.is_empty() || href.starts_with("mailto:") || href.starts_with("tel:") {
        return false;
    }

    if BINARY_EXTENSIONS.iter().any(|ext| href.ends_with(ext)) {
        return false;
    }

    let lowered = href.to_lowercase();
    if HELP_PATTERNS.iter().any(|pattern| lowered.contains(pattern)) {
        return true;
    }

    href.starts_with('/')
}
