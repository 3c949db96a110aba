pub(crate) const NOT_FOUND_BODY: &str = "Not found";
pub(crate) const INTERNAL_ERROR_BODY: &str = "Internal server error";

pub(crate) const TEXT_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// Key under which non-JSON text is wrapped when coerced to a structured object.
pub(crate) const WRAPPED_TEXT_KEY: &str = "data";

pub(crate) const DEFAULT_HOSTNAME: &str = "localhost";
pub(crate) const DEFAULT_PORT: u16 = 8000;

pub(crate) const HTTP_PORT: u16 = 80;
pub(crate) const HTTPS_PORT: u16 = 443;

pub(crate) const LOOPBACK_NAME: &str = "localhost";
pub(crate) const LOOPBACK_ADDR: &str = "127.0.0.1";

/// Characters which make a route path pattern-like.
pub(crate) const PATTERN_CHARS: [char; 4] = ['*', ':', '{', '?'];
