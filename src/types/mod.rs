use std::collections::hash_map::Iter;
use std::collections::HashMap;
use std::net::SocketAddr;

pub use self::method::Method;
pub(crate) use self::method::MethodTable;

mod method;

/// The capture groups extracted from a request path by a pattern route.
///
/// The router inserts one into every request it dispatches, so handlers and middleware always find it,
/// empty when the route is literal. Optional captures that did not participate in the match are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    pub fn new() -> RouteParams {
        RouteParams(HashMap::new())
    }

    pub fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams(HashMap::with_capacity(capacity))
    }

    pub fn set<N: Into<String>, V: Into<String>>(&mut self, param_name: N, param_val: V) {
        self.0.insert(param_name.into(), param_val.into());
    }

    pub fn get<N: AsRef<str>>(&self, param_name: N) -> Option<&String> {
        self.0.get(param_name.as_ref())
    }

    pub fn has<N: AsRef<str>>(&self, param_name: N) -> bool {
        self.0.contains_key(param_name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn params_names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        RouteParams(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

/// Connection-level metadata the service layer attaches to a request before dispatching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RequestMeta {
    remote_addr: Option<SocketAddr>,
}

impl RequestMeta {
    pub(crate) fn with_remote_addr(remote_addr: SocketAddr) -> RequestMeta {
        RequestMeta {
            remote_addr: Some(remote_addr),
        }
    }

    pub(crate) fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}
