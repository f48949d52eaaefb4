//! Page location and origin.

use std::fmt;

use url::{Host, Url};

/// Where a page was served from.
///
/// # Example
///
/// ```rust
/// use themekeeper::PageLocation;
///
/// let local = PageLocation::parse("http://localhost:8080/docs").unwrap();
/// assert!(local.is_loopback());
/// assert_eq!(local.origin(), "http://localhost:8080");
///
/// let public = PageLocation::parse("https://example.com/").unwrap();
/// assert!(!public.is_loopback());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The storage origin: scheme, host and port.
    ///
    /// Opaque origins (e.g. `file:` or `data:` URLs) serialize as `"null"`
    /// and therefore all share one storage scope.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Whether the page is served from this machine.
    ///
    /// True for `localhost`, any `*.localhost` name, `127.0.0.0/8` and `::1`.
    pub fn is_loopback(&self) -> bool {
        match self.url.host() {
            Some(Host::Domain(domain)) => {
                let domain = domain.trim_end_matches('.').to_ascii_lowercase();
                domain == "localhost" || domain.ends_with(".localhost")
            }
            Some(Host::Ipv4(addr)) => addr.is_loopback(),
            Some(Host::Ipv6(addr)) => addr.is_loopback(),
            None => false,
        }
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}
