use crate::config::RouterConfig;
use bytes::Bytes;
use hyper::header::HOST;
use hyper::Request;

/// Rebuilds the URL the request was sent to, without query or fragment.
///
/// An absolute request target is used as is. Otherwise the `Host` header supplies the authority, falling back
/// to the configured hostname and port.
pub(crate) fn request_url<B>(req: &Request<B>, config: &RouterConfig) -> String {
    let uri = req.uri();
    let path = uri.path();

    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{}://{}{}", scheme, authority, path);
    }

    if let Some(host) = req.headers().get(HOST).and_then(|host| host.to_str().ok()) {
        return format!("{}{}", host, path);
    }

    format!("{}:{}{}", config.hostname(), config.port(), path)
}

/// Yields `path` and then every prefix obtained by cutting it at its last `/`, down to the empty path.
///
/// `/book/2023` yields `/book/2023`, `/book` and `""`.
pub(crate) fn path_prefixes(path: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(path);
    std::iter::from_fn(move || {
        let current = next?;
        next = if current.is_empty() {
            None
        } else {
            Some(current.rfind('/').map(|idx| &current[..idx]).unwrap_or(""))
        };
        Some(current)
    })
}

/// A copy of the request for one more handler attempt. Extensions are carried over.
pub(crate) fn clone_request(req: &Request<Bytes>) -> Request<Bytes> {
    let mut cloned = Request::new(req.body().clone());
    *cloned.method_mut() = req.method().clone();
    *cloned.uri_mut() = req.uri().clone();
    *cloned.version_mut() = req.version();
    *cloned.headers_mut() = req.headers().clone();
    *cloned.extensions_mut() = req.extensions().clone();
    cloned
}
