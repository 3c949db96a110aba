use crate::config::RouterConfig;
use crate::middleware::Middleware;
use crate::response::Reply;
use crate::route::SharedRequest;
use crate::router::Router;
use crate::types::Method;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

type Registration = Box<dyn FnOnce(&Router) -> crate::Result<()> + Send + 'static>;

macro_rules! method_fns {
    ($($(#[$doc:meta])* $name:ident => $method:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name<P, H, R, O>(self, path: P, handler: H) -> Self
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

/// Builder for the [Router](./struct.Router.html) type.
///
/// Registrations are applied in the order they were declared when [`build`](#method.build) is called, so
/// middleware should be declared before the literal routes they apply to. The first registration error is
/// returned by `build`.
///
/// # Examples
///
/// ```
/// use switchyard::{Middleware, Next, Router, Set, SharedRequest};
///
/// async fn wrap(_: SharedRequest, next: Next, set: Set) -> switchyard::Result<()> {
///     let text = next.text().await?.unwrap_or_default();
///     set.set(format!("<{}>", text));
///     Ok(())
/// }
///
/// # fn run() -> switchyard::Result<Router> {
/// let router = Router::builder()
///     .hostname("127.0.0.1")
///     .port(3000)
///     .middleware("/", Middleware::new(wrap))
///     .get("/", |_| async move { "home" })
///     .post("/users/:id", |_| async move { "created" })
///     .build()?;
/// # Ok(router)
/// # }
/// # run().unwrap();
/// ```
pub struct RouterBuilder {
    config: RouterConfig,
    registrations: Vec<Registration>,
}

impl RouterBuilder {
    pub fn new() -> RouterBuilder {
        RouterBuilder {
            config: RouterConfig::default(),
            registrations: Vec::new(),
        }
    }

    /// The hostname literal routes are registered under. Defaults to `localhost`.
    pub fn hostname<H: AsRef<str>>(mut self, hostname: H) -> Self {
        self.config = self.config.with_hostname(hostname);
        self
    }

    /// The port literal routes are registered under. Defaults to `8000`.
    pub fn port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Whether pattern hits register literal fast paths. On by default. Fast paths accumulate per distinct
    /// request path, so turn this off for high-cardinality patterns.
    pub fn memoize_pattern_hits(mut self, enabled: bool) -> Self {
        self.config = self.config.with_memoize_pattern_hits(enabled);
        self
    }

    /// Replaces the whole config.
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add<P, H, R, O>(self, method: Method, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(SharedRequest) -> R + Send + Sync + 'static,
        R: Future<Output = O> + Send + 'static,
        O: Into<Reply> + 'static,
    {
        let path = path.into();
        self.and_then(move |router| router.add(method, path, handler))
    }

    method_fns! {
        /// Adds a `GET` route.
        get => Get,
        /// Adds a `PUT` route.
        put => Put,
        /// Adds a `POST` route.
        post => Post,
        /// Adds a `HEAD` route.
        head => Head,
        /// Adds a `PATCH` route.
        patch => Patch,
        /// Adds a `DELETE` route.
        delete => Delete,
        /// Adds an `OPTIONS` route.
        options => Options,
        /// Adds a `TRACE` route.
        trace => Trace,
        /// Adds a `CONNECT` route.
        connect => Connect,
    }

    /// Adds a route for every method.
    pub fn any<P, H, R, O>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(SharedRequest) -> R + Send + Sync + 'static,
        R: Future<Output = O> + Send + 'static,
        O: Into<Reply> + 'static,
    {
        let path = path.into();
        self.and_then(move |router| router.any(path, handler))
    }

    /// Adds a middleware for a literal route path or a path pattern.
    pub fn middleware<P: Into<String>>(self, scope: P, middleware: Middleware) -> Self {
        let scope = scope.into();
        self.and_then(move |router| router.middleware(scope, middleware))
    }

    /// Creates a new [Router](./struct.Router.html) instance from the added configuration.
    pub fn build(self) -> crate::Result<Router> {
        let router = Router::with_config(self.config);
        for registration in self.registrations {
            registration(&router)?;
        }
        Ok(router)
    }

    fn and_then<F>(mut self, registration: F) -> Self
    where
        F: FnOnce(&Router) -> crate::Result<()> + Send + 'static,
    {
        self.registrations.push(Box::new(registration));
        self
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        RouterBuilder::new()
    }
}

impl Debug for RouterBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ config: {:?}, registrations: {} }}",
            self.config,
            self.registrations.len()
        )
    }
}
