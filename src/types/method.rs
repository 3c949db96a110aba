use crate::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The closed set of HTTP methods the router dispatches on.
///
/// Every route table is indexed by this enum, so a request carrying any other method is simply unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Put,
    Post,
    Head,
    Patch,
    Delete,
    Options,
    Trace,
    Connect,
}

impl Method {
    pub(crate) const COUNT: usize = 9;

    /// All methods in table order.
    pub const ALL: [Method; Method::COUNT] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Head,
        Method::Patch,
        Method::Delete,
        Method::Options,
        Method::Trace,
        Method::Connect,
    ];

    /// The canonical upper-case name, as it appears in route keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }

    /// Maps a `hyper` method onto the closed set. Extension methods yield `None`.
    pub fn from_http(method: &http::Method) -> Option<Method> {
        Method::ALL.iter().copied().find(|m| m.as_str() == method.as_str())
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedMethod(s.to_owned()))
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Put => http::Method::PUT,
            Method::Post => http::Method::POST,
            Method::Head => http::Method::HEAD,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
            Method::Options => http::Method::OPTIONS,
            Method::Trace => http::Method::TRACE,
            Method::Connect => http::Method::CONNECT,
        }
    }
}

/// One slot per [`Method`], addressed without hashing.
#[derive(Debug)]
pub(crate) struct MethodTable<T>([T; Method::COUNT]);

impl<T: Default> Default for MethodTable<T> {
    fn default() -> Self {
        MethodTable(std::array::from_fn(|_| T::default()))
    }
}

impl<T> MethodTable<T> {
    pub(crate) fn get(&self, method: Method) -> &T {
        &self.0[method.index()]
    }

    pub(crate) fn get_mut(&mut self, method: Method) -> &mut T {
        &mut self.0[method.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_every_method_through_hyper() {
        for method in Method::ALL {
            let http_method: http::Method = method.into();
            assert_eq!(Method::from_http(&http_method), Some(method));
        }
    }

    #[test]
    fn should_parse_method_names_case_insensitively() {
        assert_eq!("patch".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("OPTIONS".parse::<Method>().unwrap(), Method::Options);
        assert!(matches!("PURGE".parse::<Method>(), Err(Error::UnsupportedMethod(_))));
    }

    #[test]
    fn should_keep_table_slots_apart() {
        let mut table: MethodTable<Vec<&str>> = MethodTable::default();
        table.get_mut(Method::Get).push("a");
        table.get_mut(Method::Connect).push("b");

        assert_eq!(table.get(Method::Get), &vec!["a"]);
        assert_eq!(table.get(Method::Connect), &vec!["b"]);
        assert!(table.get(Method::Post).is_empty());
    }

    #[test]
    fn should_reject_extension_methods() {
        let purge = http::Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(Method::from_http(&purge), None);
    }
}
