use crate::helpers::path_prefixes;
use crate::route::{Handler, LiteralRoute, PatternMatcher, PatternRoute};
use crate::types::{Method, MethodTable};
use std::collections::HashMap;

/// Literal routes keyed by their equivalence keys and pattern routes bucketed by shorthand, one slot per
/// method.
#[derive(Debug, Default)]
pub(crate) struct RouteTable {
    literal: MethodTable<HashMap<String, LiteralRoute>>,
    patterns: MethodTable<HashMap<String, Vec<PatternRoute>>>,
    last_pattern_id: u64,
}

impl RouteTable {
    /// Stores `route` under every key. The last registration wins.
    pub(crate) fn insert_literal(&mut self, method: Method, keys: Vec<String>, route: LiteralRoute) {
        let routes = self.literal.get_mut(method);
        for key in keys {
            routes.insert(key, route.clone());
        }
    }

    /// Stores `route` under the keys that are still free. Returns how many were taken.
    ///
    /// A route memoized from a pattern that is no longer registered is not stored at all.
    pub(crate) fn insert_literal_if_absent(&mut self, method: Method, keys: Vec<String>, route: LiteralRoute) -> usize {
        if let Some(origin) = route.origin {
            if !self.has_pattern(method, origin) {
                return 0;
            }
        }

        let routes = self.literal.get_mut(method);
        let mut inserted = 0;
        for key in keys {
            if !routes.contains_key(&key) {
                routes.insert(key, route.clone());
                inserted += 1;
            }
        }
        inserted
    }

    pub(crate) fn remove_literal(&mut self, method: Method, keys: &[String]) -> bool {
        let routes = self.literal.get_mut(method);
        keys.iter().fold(false, |removed, key| routes.remove(key).is_some() || removed)
    }

    pub(crate) fn literal(&self, method: Method, key: &str) -> Option<LiteralRoute> {
        self.literal.get(method).get(key).cloned()
    }

    pub(crate) fn insert_pattern(&mut self, method: Method, matcher: PatternMatcher, handler: Handler) -> u64 {
        self.last_pattern_id += 1;
        let id = self.last_pattern_id;

        self.patterns
            .get_mut(method)
            .entry(matcher.shorthand().to_owned())
            .or_default()
            .push(PatternRoute::new(id, matcher, handler));

        id
    }

    /// Removes every pattern route registered with exactly `path`, together with the fast paths memoized from
    /// them.
    pub(crate) fn remove_pattern(&mut self, method: Method, path: &str) -> bool {
        let buckets = self.patterns.get_mut(method);
        let mut removed_ids = Vec::new();

        buckets.retain(|_, bucket| {
            bucket.retain(|route| {
                let keep = route.path() != path;
                if !keep {
                    removed_ids.push(route.id);
                }
                keep
            });
            !bucket.is_empty()
        });

        if removed_ids.is_empty() {
            return false;
        }

        self.literal
            .get_mut(method)
            .retain(|_, route| !matches!(route.origin, Some(origin) if removed_ids.contains(&origin)));
        true
    }

    fn has_pattern(&self, method: Method, id: u64) -> bool {
        self.patterns
            .get(method)
            .values()
            .any(|bucket| bucket.iter().any(|route| route.id == id))
    }

    /// The first bucket found for `path`, trying the path and then each shorter prefix.
    pub(crate) fn bucket(&self, method: Method, path: &str) -> Option<Vec<PatternRoute>> {
        let buckets = self.patterns.get(method);
        path_prefixes(path).find_map(|prefix| buckets.get(prefix).cloned())
    }
}
