use super::{EffectiveSequence, Middleware, MiddlewareEntry};
use crate::route::{is_pattern, PatternMatcher};
use std::collections::HashMap;

/// Keeps every registered middleware with its scope and its global registration id.
///
/// Scopes are method independent. A literal scope applies to the route registered at exactly that path, a
/// pattern scope to every route whose path it matches.
#[derive(Debug, Default)]
pub(crate) struct MiddlewareRegistry {
    last_id: u64,
    literal: HashMap<String, Vec<MiddlewareEntry>>,
    patterns: Vec<(MiddlewareEntry, PatternMatcher)>,
}

impl MiddlewareRegistry {
    /// Registers a middleware and returns the id it was assigned.
    pub(crate) fn add(&mut self, scope: String, middleware: Middleware) -> crate::Result<u64> {
        // Compile first, a rejected pattern must not consume an id.
        let matcher = if is_pattern(&scope) {
            Some(PatternMatcher::new(scope.as_str())?)
        } else {
            None
        };

        self.last_id += 1;
        let entry = MiddlewareEntry {
            id: self.last_id,
            middleware,
        };

        match matcher {
            Some(matcher) => self.patterns.push((entry, matcher)),
            None => self.literal.entry(scope).or_default().push(entry),
        }

        Ok(self.last_id)
    }

    /// The middleware that apply to a route at `path`, frozen in registration order.
    pub(crate) fn effective_sequence(&self, path: &str) -> EffectiveSequence {
        let mut entries = self.literal.get(path).cloned().unwrap_or_default();
        entries.extend(
            self.patterns
                .iter()
                .filter(|(_, matcher)| matcher.test(path))
                .map(|(entry, _)| entry.clone()),
        );

        EffectiveSequence::new(entries)
    }

    pub(crate) fn len(&self) -> usize {
        self.literal.values().map(Vec::len).sum::<usize>() + self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{Next, Set};
    use crate::route::SharedRequest;
    use crate::Error;

    async fn noop(_: SharedRequest, _: Next, _: Set) -> crate::Result<()> {
        Ok(())
    }

    #[test]
    fn should_merge_scopes_by_registration_order() {
        let mut registry = MiddlewareRegistry::default();
        let a = registry.add("/middleware/*".to_owned(), Middleware::new(noop)).unwrap();
        let b = registry.add("/middleware/string".to_owned(), Middleware::new(noop)).unwrap();
        let c = registry.add("/other".to_owned(), Middleware::new(noop)).unwrap();
        let d = registry.add("/:section/string".to_owned(), Middleware::new(noop)).unwrap();

        assert_eq!(registry.effective_sequence("/middleware/string").ids(), vec![a, b, d]);
        assert_eq!(registry.effective_sequence("/middleware/json").ids(), vec![a]);
        assert_eq!(registry.effective_sequence("/other").ids(), vec![c]);
        assert!(registry.effective_sequence("/nothing/here").is_empty());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn should_not_consume_id_on_invalid_scope() {
        let mut registry = MiddlewareRegistry::default();
        let err = registry.add("/broken/:".to_owned(), Middleware::new(noop)).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));

        assert_eq!(registry.add("/ok".to_owned(), Middleware::new(noop)).unwrap(), 1);
    }

    #[test]
    fn should_keep_computed_sequence_frozen() {
        let mut registry = MiddlewareRegistry::default();
        registry.add("/*".to_owned(), Middleware::new(noop)).unwrap();

        let frozen = registry.effective_sequence("/page");
        registry.add("/page".to_owned(), Middleware::new(noop)).unwrap();

        assert_eq!(frozen.len(), 1);
        assert_eq!(registry.effective_sequence("/page").len(), 2);
    }
}
