use crate::constants::PATTERN_CHARS;
use crate::regex_generator::{generate_exact_match_regex, group_name, pattern_shorthand};
use crate::types::RouteParams;
use regex::Regex;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Checks whether a route path should be compiled as a pattern rather than stored as a literal route.
///
/// # Examples
///
/// ```
/// use switchyard::is_pattern;
///
/// assert!(!is_pattern("/books/johnny_bravo"));
/// assert!(is_pattern("/books/:author"));
/// assert!(is_pattern("/static/*"));
/// ```
pub fn is_pattern(path: &str) -> bool {
    path.contains(&PATTERN_CHARS[..])
}

/// A compiled path pattern.
///
/// Supports named segments (`/books/:id`), regex constrained segments (`/books/:id(\d+)`), positional regex
/// groups (`/v(\d+)`), an uncaptured wildcard (`/static/*`) and optional groups (`/books{/archive/:room}?/:id`).
/// Named segments inside an optional group are absent from the captures when the group did not match.
///
/// Cloning is cheap, the compiled regex is shared.
#[derive(Clone)]
pub struct PatternMatcher {
    inner: Arc<Inner>,
}

struct Inner {
    path: String,
    regex: Regex,
    params: Vec<(String, String)>,
}

impl PatternMatcher {
    /// Compiles a pattern. Malformed patterns are rejected here, never while matching.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchyard::PatternMatcher;
    ///
    /// let matcher = PatternMatcher::new("/books{/archive/:room}?/:id").unwrap();
    ///
    /// let groups = matcher.exec("/books/archive/5/1").unwrap();
    /// assert_eq!(groups.get("room").map(String::as_str), Some("5"));
    /// assert_eq!(groups.get("id").map(String::as_str), Some("1"));
    ///
    /// let groups = matcher.exec("/books/1").unwrap();
    /// assert!(!groups.has("room"));
    /// ```
    pub fn new<P: Into<String>>(path: P) -> crate::Result<PatternMatcher> {
        let path = path.into();
        let (regex, names) = generate_exact_match_regex(path.as_str())?;
        let params = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name, group_name(idx)))
            .collect();

        Ok(PatternMatcher {
            inner: Arc::new(Inner { path, regex, params }),
        })
    }

    /// The pattern as it was registered.
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// The literal prefix the pattern is bucketed under.
    pub fn shorthand(&self) -> &str {
        pattern_shorthand(&self.inner.path)
    }

    /// The capture names in order of appearance.
    pub fn param_names(&self) -> impl Iterator<Item = &String> {
        self.inner.params.iter().map(|(name, _)| name)
    }

    pub fn test(&self, path: &str) -> bool {
        self.inner.regex.is_match(path)
    }

    /// Matches a concrete request path and extracts its capture groups.
    pub fn exec(&self, path: &str) -> Option<RouteParams> {
        let caps = self.inner.regex.captures(path)?;

        let mut route_params = RouteParams::with_capacity(self.inner.params.len());
        for (name, group) in self.inner.params.iter() {
            if let Some(m) = caps.name(group) {
                route_params.set(name.as_str(), m.as_str());
            }
        }

        Some(route_params)
    }
}

impl Debug for PatternMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ path: {:?}, regex: {:?}, params: {:?} }}",
            self.inner.path,
            self.inner.regex,
            self.param_names().collect::<Vec<_>>()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_capture_digits_only() {
        let matcher = PatternMatcher::new(r"/book/:id(\d+)").unwrap();

        let groups = matcher.exec("/book/2023").unwrap();
        assert_eq!(groups.get("id").unwrap(), "2023");
        assert_eq!(groups.len(), 1);

        for path in ["/book/Johnny", "/book/", "/book/-1", "/book/undefined", "/book/π"].iter() {
            assert!(matcher.exec(path).is_none(), "{} should not match", path);
            assert!(!matcher.test(path));
        }
    }

    #[test]
    fn should_leave_unmatched_optional_groups_out() {
        let matcher = PatternMatcher::new(r"/books{/archive/:room(\d+)}?/book{/by_author/:author(\w+)}?/:id").unwrap();

        let groups = matcher.exec("/books/book/7").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("id").unwrap(), "7");

        let groups = matcher.exec("/books/archive/12/book/by_author/tolkien/7").unwrap();
        assert_eq!(groups.get("room").unwrap(), "12");
        assert_eq!(groups.get("author").unwrap(), "tolkien");
        assert_eq!(groups.get("id").unwrap(), "7");

        assert!(matcher.exec("/books/archive/twelve/book/7").is_none());
    }

    #[test]
    fn should_match_whole_path_only() {
        let matcher = PatternMatcher::new("/users/:id").unwrap();
        assert!(matcher.test("/users/1"));
        assert!(!matcher.test("/users/1/posts"));
        assert!(!matcher.test("/api/users/1"));
    }

    #[test]
    fn should_detect_pattern_like_paths() {
        assert!(!is_pattern("/"));
        assert!(!is_pattern("/about/team"));
        assert!(is_pattern("/books{/archive}?"));
        assert!(is_pattern("/search?"));
    }

    #[test]
    fn should_expose_shorthand() {
        let matcher = PatternMatcher::new("/middleware/*").unwrap();
        assert_eq!(matcher.shorthand(), "/middleware");
        assert_eq!(matcher.path(), "/middleware/*");
    }
}
