use crate::constants::{HTTPS_PORT, HTTP_PORT, LOOPBACK_ADDR, LOOPBACK_NAME};
use crate::types::Method;

/// Every literal key a route at `host:port` + `path` must be reachable through.
///
/// The loopback name and address alias each other, one level deep.
pub(crate) fn equivalent_keys(method: Method, host: &str, port: u16, path: &str) -> Vec<String> {
    let mut keys = Vec::with_capacity(10);
    push_keys(&mut keys, method, host, port, path, false);
    keys
}

/// The key a request is looked up under.
pub(crate) fn lookup_key(method: Method, url: &str) -> String {
    format!("{}/{}", method.as_str(), url)
}

fn push_keys(keys: &mut Vec<String>, method: Method, host: &str, port: u16, path: &str, forwarded: bool) {
    let with_port = format!("{}:{}{}", host, port, path);
    keys.push(lookup_key(method, &with_port));
    keys.push(lookup_key(method, &format!("http://{}", with_port)));
    keys.push(lookup_key(method, &format!("https://{}", with_port)));

    let canonical_scheme = match port {
        HTTP_PORT => Some("http"),
        HTTPS_PORT => Some("https"),
        _ => None,
    };
    if let Some(scheme) = canonical_scheme {
        let bare = format!("{}{}", host, path);
        keys.push(lookup_key(method, &format!("{}://{}", scheme, bare)));
        keys.push(lookup_key(method, &bare));
    }

    if forwarded {
        return;
    }

    let alias = match host {
        LOOPBACK_ADDR => Some(LOOPBACK_NAME),
        LOOPBACK_NAME => Some(LOOPBACK_ADDR),
        _ => None,
    };
    if let Some(alias) = alias {
        push_keys(keys, method, alias, port, path, true);
    }
}
