//! Extractive summaries and description confidence

/// Character budget for a summary, before the trailing period is added
pub const SUMMARY_BUDGET: usize = 320;

const SEPARATOR: &str = ". ";

/// Descriptions shorter than this get the floor confidence
const SHORT_DESCRIPTION: usize = 80;

/// Confidence of a short description
pub const SHORT_CONFIDENCE: f64 = 0.4;

/// Leading sentences of `body` that fit the summary budget
///
/// The body is split on `". "`. Fragments are kept while the joined text,
/// separators included, fits [`SUMMARY_BUDGET`]. The result ends with a
/// period unless empty. A first sentence longer than the budget yields an
/// empty summary.
///
/// # Example
///
/// ```
/// use pulse_extractor::infer::summarize;
///
/// assert_eq!(summarize("Invoices go out monthly. Pay by card"), "Invoices go out monthly. Pay by card.");
/// assert_eq!(summarize(""), "");
/// ```
pub fn summarize(body: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut kept_chars = 0;

    for fragment in body.split(SEPARATOR) {
        let fragment = fragment.trim();
        let separator = if kept.is_empty() { 0 } else { SEPARATOR.len() };
        let joined = kept_chars + separator + fragment.chars().count();
        if joined > SUMMARY_BUDGET {
            break;
        }
        kept_chars = joined;
        kept.push(fragment);
    }

    let mut summary = kept.join(SEPARATOR).trim().to_string();
    if !summary.is_empty() && !summary.ends_with('.') {
        summary.push('.');
    }
    summary
}

/// Heuristic confidence that `text` describes a real feature
///
/// Short text scores [`SHORT_CONFIDENCE`]. Longer text scores by length
/// (logarithmically) with a small bonus per sentence terminator, capped at 1.
pub fn score_description(text: &str) -> f64 {
    let length = text.chars().count();
    if length < SHORT_DESCRIPTION {
        return SHORT_CONFIDENCE;
    }

    let sentences = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
    let base = (((length + 10) as f64).log10() / 3.0).min(1.0);
    let bonus = (sentences as f64 * 0.03).min(0.3);
    (0.5 + base + bonus).min(1.0)
}
