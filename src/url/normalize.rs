use url::{ParseError, Url};

/// Normalizes a seed or discovered URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Parse the URL; when no scheme is present, retry with `https://` prepended
/// 3. Reject anything that is not `http` or `https`
/// 4. Remove the fragment (everything after #)
///
/// Malformed input is not an error: it is dropped by returning `None`.
///
/// # Examples
///
/// ```
/// use pulse_extractor::url::normalize_url;
///
/// let url = normalize_url("docs.example.com/start#intro").unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/start");
///
/// assert!(normalize_url("ftp://example.com/file").is_none());
/// ```
pub fn normalize_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", raw)).ok()?,
        Err(e) => {
            tracing::debug!("Dropping malformed URL {:?}: {}", raw, e);
            return None;
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        tracing::debug!("Dropping URL with unsupported scheme: {}", url);
        return None;
    }

    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
