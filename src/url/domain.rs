use std::fmt;
use url::{Host, Url};

/// The three components of a host name under the public suffix list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    /// Everything left of the registrable domain (e.g. "help" in help.example.co.uk)
    pub subdomain: String,

    /// The registrable label (e.g. "example")
    pub domain: String,

    /// The public suffix (e.g. "co.uk")
    pub suffix: String,
}

impl DomainParts {
    /// Splits a host name into subdomain, registrable label and public suffix
    ///
    /// Hosts that are themselves a public suffix (such as `localhost`) are
    /// treated as a bare domain with no suffix.
    pub fn from_host(host: &str) -> Self {
        let host = host.trim_end_matches('.').to_lowercase();

        let (registrable, suffix) = match (psl::domain_str(&host), psl::suffix_str(&host)) {
            (Some(registrable), Some(suffix)) => (registrable.to_string(), suffix.to_string()),
            _ => {
                return Self {
                    domain: host,
                    ..Self::default()
                }
            }
        };

        let domain = registrable
            .strip_suffix(&suffix)
            .map(|label| label.trim_end_matches('.'))
            .unwrap_or(&registrable)
            .to_string();

        let subdomain = host
            .strip_suffix(&registrable)
            .map(|rest| rest.trim_end_matches('.'))
            .unwrap_or("")
            .to_string();

        Self {
            subdomain,
            domain,
            suffix,
        }
    }

    /// Joins the non-empty parts with `.`
    pub fn joined(&self) -> String {
        [&self.subdomain, &self.domain, &self.suffix]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Partition key used for crawl scheduling and same-domain link filtering
///
/// Two URLs belong to the same domain when their keys compare equal. The port
/// and scheme are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainKey(String);

impl DomainKey {
    /// Derives the domain key from a URL
    ///
    /// # Returns
    ///
    /// * `Some(DomainKey)` - The joined subdomain, domain and suffix
    /// * `None` - If the URL has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use pulse_extractor::url::DomainKey;
    ///
    /// let a = DomainKey::from_url(&Url::parse("https://Help.Example.com/a").unwrap()).unwrap();
    /// let b = DomainKey::from_url(&Url::parse("http://help.example.com:8080/b").unwrap()).unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "help.example.com");
    /// ```
    pub fn from_url(url: &Url) -> Option<Self> {
        let key = match url.host()? {
            Host::Domain(domain) => DomainParts::from_host(domain).joined(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6(addr) => addr.to_string(),
        };

        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
