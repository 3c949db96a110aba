use crate::config::RouterConfig;
use crate::helpers;
use crate::middleware::{HandlerPipeline, Middleware, MiddlewareRegistry, ReadyHandler};
use crate::response::{to_response, Reply};
use crate::route::{boxed_handler, is_pattern, Handler, LiteralRoute, PatternMatcher, SharedRequest};
use crate::types::{Method, RouteParams};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use self::builder::RouterBuilder;

mod builder;
mod keys;
mod table;

use self::table::RouteTable;

macro_rules! method_fns {
    ($($(#[$doc:meta])* $name:ident => $method:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name<P, H, R, O>(&self, path: P, handler: H) -> crate::Result<()>
            where
                P: Into<String>,
                H: Fn(SharedRequest) -> R + Send + Sync + 'static,
                R: Future<Output = O> + Send + 'static,
                O: Into<Reply> + 'static,
            {
                self.add(Method::$method, path, handler)
            }
        )*
    };
}

/// Maps a method and a URL to a route handler and runs its middleware.
///
/// Literal routes are looked up by exact key. Pattern routes are tried in registration order within the bucket
/// of their literal prefix, and a hit registers a literal fast path for the concrete path. Please refer to the
/// [Routing](./index.html#routing) section for details.
///
/// Registration works through `&self`, so routes can be added or removed while the router serves requests.
///
/// # Examples
///
/// ```
/// use switchyard::prelude::*;
/// use switchyard::{Router, SharedRequest};
///
/// async fn user(req: SharedRequest) -> String {
///     format!("Hello {}", req.group("userId").map(String::as_str).unwrap_or("stranger"))
/// }
///
/// # async fn run() -> switchyard::Result<()> {
/// let router = Router::new();
/// router.get("/users/:userId", user)?;
///
/// let req = hyper::Request::get("http://localhost:8000/users/42").body(bytes::Bytes::new()).unwrap();
/// let res = router.resolve(req).await?.expect("route should resolve");
/// assert_eq!(res.status(), 200);
/// # Ok(())
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(run()).unwrap();
/// ```
pub struct Router {
    config: RouterConfig,
    table: RwLock<RouteTable>,
    middlewares: RwLock<MiddlewareRegistry>,
}

impl Router {
    /// A router with the default config: `localhost:8000`.
    pub fn new() -> Router {
        Router::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Router {
        Router {
            config,
            table: RwLock::new(RouteTable::default()),
            middlewares: RwLock::new(MiddlewareRegistry::default()),
        }
    }

    /// Return a [RouterBuilder](./struct.RouterBuilder.html) instance to build a `Router`.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Registers a handler for one method.
    ///
    /// A path containing `*`, `:`, `{` or `?` is compiled as a pattern, a malformed one is rejected here. Any
    /// other path is a literal route, compiled right away with the middleware registered so far.
    pub fn add<P, H, R, O>(&self, method: Method, path: P, handler: H) -> crate::Result<()>
    where
        P: Into<String>,
        H: Fn(SharedRequest) -> R + Send + Sync + 'static,
        R: Future<Output = O> + Send + 'static,
        O: Into<Reply> + 'static,
    {
        self.add_boxed(method, path.into(), boxed_handler(handler))
    }

    method_fns! {
        /// Registers a `GET` handler.
        get => Get,
        /// Registers a `PUT` handler.
        put => Put,
        /// Registers a `POST` handler.
        post => Post,
        /// Registers a `HEAD` handler.
        head => Head,
        /// Registers a `PATCH` handler.
        patch => Patch,
        /// Registers a `DELETE` handler.
        delete => Delete,
        /// Registers an `OPTIONS` handler.
        options => Options,
        /// Registers a `TRACE` handler.
        trace => Trace,
        /// Registers a `CONNECT` handler.
        connect => Connect,
    }

    /// Registers the same handler for every method.
    pub fn any<P, H, R, O>(&self, path: P, handler: H) -> crate::Result<()>
    where
        P: Into<String>,
        H: Fn(SharedRequest) -> R + Send + Sync + 'static,
        R: Future<Output = O> + Send + 'static,
        O: Into<Reply> + 'static,
    {
        let path = path.into();
        let handler = boxed_handler(handler);
        for method in Method::ALL {
            self.add_boxed(method, path.clone(), handler.clone())?;
        }
        Ok(())
    }

    /// Registers a middleware for a literal route path or a path pattern.
    ///
    /// It applies to routes compiled afterwards: literal routes registered later and pattern hits resolved later.
    pub fn middleware<P: Into<String>>(&self, scope: P, middleware: Middleware) -> crate::Result<()> {
        let scope = scope.into();
        let mut registry = self.write_registry();
        let id = registry.add(scope.clone(), middleware)?;
        tracing::debug!(scope = %scope, id, total = registry.len(), "registered middleware");
        Ok(())
    }

    /// Removes a route. Returns `false` if nothing was registered at `path` for `method`.
    ///
    /// A literal route loses all its equivalent keys. A pattern route is removed together with every fast path
    /// memoized from it.
    pub fn unregister<P: AsRef<str>>(&self, method: Method, path: P) -> bool {
        let path = path.as_ref();
        let removed = if is_pattern(path) {
            self.write_table().remove_pattern(method, path)
        } else {
            let keys = self.literal_keys(method, path);
            self.write_table().remove_literal(method, &keys)
        };

        tracing::debug!(%method, path, removed, "unregistered route");
        removed
    }

    /// Dispatches a request.
    ///
    /// `Ok(None)` means the request is unresolved: no route matched, the method is not supported or the
    /// handler produced nothing. Answer it with [`not_found`](./fn.not_found.html).
    pub async fn resolve(&self, mut req: Request<Bytes>) -> crate::Result<Option<Response<Full<Bytes>>>> {
        let method = match Method::from_http(req.method()) {
            Some(method) => method,
            None => {
                tracing::trace!(method = %req.method(), "unsupported method");
                return Ok(None);
            }
        };

        req.extensions_mut().insert(RouteParams::new());

        let key = keys::lookup_key(method, &helpers::request_url(&req, &self.config));
        let literal = self.read_table().literal(method, &key);

        let reply = match literal {
            Some(route) => {
                tracing::trace!(key = %key, origin = ?route.origin, "literal hit");
                Pin::from((route.handler)(req)).await?
            }
            None => self.resolve_pattern(method, req).await?,
        };

        to_response(reply).await
    }

    async fn resolve_pattern(&self, method: Method, req: Request<Bytes>) -> crate::Result<Reply> {
        let path = req.uri().path().to_owned();
        let bucket = match self.read_table().bucket(method, &path) {
            Some(bucket) => bucket,
            None => {
                tracing::trace!(%method, path = %path, "no pattern bucket");
                return Ok(Reply::Absent);
            }
        };

        for route in bucket {
            let groups = match route.matcher.exec(&path) {
                Some(groups) => groups,
                None => continue,
            };
            tracing::trace!(pattern = route.path(), path = %path, "pattern hit");

            let handler = self.compile(route.handler.clone(), &path, Some(groups));
            let reply = Pin::from(handler(helpers::clone_request(&req))).await?;
            if reply.is_absent() {
                continue;
            }

            if self.config.memoize_pattern_hits() {
                self.memoize(method, &path, LiteralRoute::new(handler, Some(route.id)));
            }
            return Ok(reply);
        }

        Ok(Reply::Absent)
    }

    fn add_boxed(&self, method: Method, path: String, handler: Handler) -> crate::Result<()> {
        if is_pattern(&path) {
            let matcher = PatternMatcher::new(path.as_str())?;
            let id = self.write_table().insert_pattern(method, matcher, handler);
            tracing::debug!(%method, path = %path, id, "registered pattern route");
        } else {
            let handler = self.compile(handler, &path, None);
            let keys = self.literal_keys(method, &path);
            self.write_table().insert_literal(method, keys, LiteralRoute::new(handler, None));
            tracing::debug!(%method, path = %path, "registered literal route");
        }
        Ok(())
    }

    fn compile(&self, handler: Handler, path: &str, groups: Option<RouteParams>) -> ReadyHandler {
        let sequence = self.read_registry().effective_sequence(path);
        tracing::trace!(path, middlewares = ?sequence.ids(), "compiled route");
        HandlerPipeline::build(handler, sequence, groups)
    }

    fn memoize(&self, method: Method, path: &str, route: LiteralRoute) {
        let keys = self.literal_keys(method, path);
        let inserted = self.write_table().insert_literal_if_absent(method, keys, route);
        if inserted > 0 {
            tracing::debug!(%method, path, "memoized pattern hit");
        }
    }

    fn literal_keys(&self, method: Method, path: &str) -> Vec<String> {
        keys::equivalent_keys(method, self.config.hostname(), self.config.port(), path)
    }

    fn read_table(&self) -> RwLockReadGuard<'_, RouteTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, RouteTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_registry(&self) -> RwLockReadGuard<'_, MiddlewareRegistry> {
        self.middlewares.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_registry(&self) -> RwLockWriteGuard<'_, MiddlewareRegistry> {
        self.middlewares.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Router {
    fn default() -> Self {
        Router::new()
    }
}

impl Debug for Router {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ config: {:?}, table: {:?}, middlewares: {:?} }}",
            self.config,
            self.read_table(),
            self.read_registry()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn request(uri: &str) -> Request<Bytes> {
        Request::get(uri).body(Bytes::new()).unwrap()
    }

    fn memoized_origin(router: &Router, method: Method, path: &str) -> Option<Option<u64>> {
        let key = keys::lookup_key(method, &format!("localhost:8000{}", path));
        router.read_table().literal(method, &key).map(|route| route.origin)
    }

    #[tokio::test]
    async fn should_memoize_pattern_hits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let router = Router::new();
        router
            .get("/users/:id", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { "user" }
            })
            .unwrap();

        assert!(memoized_origin(&router, Method::Get, "/users/1").is_none());
        assert!(router.resolve(request("http://localhost:8000/users/1")).await.unwrap().is_some());
        assert_eq!(memoized_origin(&router, Method::Get, "/users/1"), Some(Some(1)));

        // Served by the fast path now.
        assert!(router.resolve(request("http://127.0.0.1:8000/users/1")).await.unwrap().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn should_not_memoize_when_disabled() {
        let router = Router::with_config(RouterConfig::default().with_memoize_pattern_hits(false));
        router.get("/users/:id", |_| async move { "user" }).unwrap();

        assert!(router.resolve(request("http://localhost:8000/users/1")).await.unwrap().is_some());
        assert!(memoized_origin(&router, Method::Get, "/users/1").is_none());
    }

    #[tokio::test]
    async fn should_not_memoize_absent_replies() {
        let router = Router::new();
        router.get("/users/:id", |_| async move {}).unwrap();

        assert!(router.resolve(request("http://localhost:8000/users/1")).await.unwrap().is_none());
        assert!(memoized_origin(&router, Method::Get, "/users/1").is_none());
    }

    #[tokio::test]
    async fn should_unregister_pattern_with_its_fast_paths() {
        let router = Router::new();
        router.get("/users/:id", |_| async move { "user" }).unwrap();
        router.resolve(request("http://localhost:8000/users/1")).await.unwrap();

        assert!(router.unregister(Method::Get, "/users/:id"));
        assert!(memoized_origin(&router, Method::Get, "/users/1").is_none());
        assert!(router.resolve(request("http://localhost:8000/users/1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_not_revive_pattern_unregistered_mid_request() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());

        let router = Router::new();
        let (handler_entered, handler_release) = (entered.clone(), release.clone());
        router
            .get("/users/:id", move |_| {
                let entered = handler_entered.clone();
                let release = handler_release.clone();
                async move {
                    entered.notify_one();
                    release.notified().await;
                    "user"
                }
            })
            .unwrap();

        let in_flight = router.resolve(request("http://localhost:8000/users/1"));
        let unregister = async {
            entered.notified().await;
            let removed = router.unregister(Method::Get, "/users/:id");
            release.notify_one();
            removed
        };

        let (res, removed) = tokio::join!(in_flight, unregister);
        assert!(removed);
        assert!(res.unwrap().is_some());

        assert!(memoized_origin(&router, Method::Get, "/users/1").is_none());
        assert!(router.resolve(request("http://localhost:8000/users/1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_unregister_literal_route() {
        let router = Router::new();
        router.post("/submit", |_| async move { "ok" }).unwrap();

        assert!(router.unregister(Method::Post, "/submit"));
        assert!(!router.unregister(Method::Post, "/submit"));

        let req = Request::post("http://localhost:8000/submit").body(Bytes::new()).unwrap();
        assert!(router.resolve(req).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_leave_unsupported_methods_unresolved() {
        let router = Router::new();
        router.any("/", |_| async move { "root" }).unwrap();

        let req = Request::builder()
            .method(http::Method::from_bytes(b"PURGE").unwrap())
            .uri("http://localhost:8000/")
            .body(Bytes::new())
            .unwrap();
        assert!(router.resolve(req).await.unwrap().is_none());

        let req = Request::delete("http://localhost:8000/").body(Bytes::new()).unwrap();
        assert!(router.resolve(req).await.unwrap().is_some());
    }
}
