use crate::constants::{DEFAULT_HOSTNAME, DEFAULT_PORT};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCHEME_PREFIX: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// The host identity literal routes are registered under, and how pattern hits are cached.
///
/// # Examples
///
/// ```
/// use switchyard::RouterConfig;
///
/// let config = RouterConfig::new("https://example.com/", 443);
/// assert_eq!(config.hostname(), "example.com");
/// assert_eq!(config.port(), 443);
/// assert!(config.memoize_pattern_hits());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    hostname: String,
    port: u16,
    memoize_pattern_hits: bool,
}

impl RouterConfig {
    /// Creates a config. A leading `http://` or `https://` and a trailing `/` are stripped from the hostname.
    pub fn new<H: AsRef<str>>(hostname: H, port: u16) -> RouterConfig {
        RouterConfig {
            hostname: normalize_hostname(hostname.as_ref()),
            port,
            memoize_pattern_hits: true,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether a pattern hit registers a literal fast path for the concrete request path.
    ///
    /// Fast paths are kept until their pattern is unregistered. Every distinct path that hits a pattern adds
    /// up to ten keys, without bound, so turn this off for patterns matching many distinct paths, such as ids.
    pub fn memoize_pattern_hits(&self) -> bool {
        self.memoize_pattern_hits
    }

    pub fn with_hostname<H: AsRef<str>>(mut self, hostname: H) -> RouterConfig {
        self.hostname = normalize_hostname(hostname.as_ref());
        self
    }

    pub fn with_port(mut self, port: u16) -> RouterConfig {
        self.port = port;
        self
    }

    /// Enables or disables pattern hit memoization. See [`memoize_pattern_hits`](#method.memoize_pattern_hits).
    pub fn with_memoize_pattern_hits(mut self, enabled: bool) -> RouterConfig {
        self.memoize_pattern_hits = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig::new(DEFAULT_HOSTNAME, DEFAULT_PORT)
    }
}

fn normalize_hostname(hostname: &str) -> String {
    let stripped = SCHEME_PREFIX.replace(hostname.trim(), "");
    stripped.trim_end_matches('/').to_owned()
}
