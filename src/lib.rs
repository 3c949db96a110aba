//! `switchyard` is an in-process HTTP request router with a concurrent middleware pipeline, built on
//! [hyper](https://hyper.rs/).
//!
//! Its core features:
//!
//! - 🚀 Literal routes are resolved by a single exact key lookup, reachable through every host form a client
//!   might send (`localhost:8000/a`, `http://127.0.0.1:8000/a`, ...).
//!
//! - 🌀 Pattern routes with named, optional and regex constrained captures, tried in registration order, with
//!   a literal fast path memoized on every hit.
//!
//! - 🍺 Handlers may return text, a JSON value, a ready-made response or nothing at all.
//!
//! - 🔥 Middleware run alongside the handler, read its result in whatever shape they need and rewrite it,
//!   without ever running the handler twice.
//!
//! ## Basic Example
//!
//! ```no_run
//! use hyper::service::Service;
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! // Import the prelude traits.
//! use switchyard::prelude::*;
//! use switchyard::{Middleware, Next, Router, RouterService, Set, SharedRequest};
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! // A handler for "/" page.
//! async fn home_handler(_: SharedRequest) -> &'static str {
//!     "Home page"
//! }
//!
//! // A handler for "/users/:userId" page.
//! async fn user_handler(req: SharedRequest) -> String {
//!     format!("Hello {}", req.group("userId").unwrap())
//! }
//!
//! // A middleware which logs the request and the handler's result.
//! async fn logger(req: SharedRequest, next: Next, _: Set) -> switchyard::Result<()> {
//!     let reply = next.reply().await?;
//!     println!("{} {} -> {:?}", req.method(), req.uri().path(), reply.representation());
//!     Ok(())
//! }
//!
//! fn router() -> switchyard::Result<Router> {
//!     Router::builder()
//!         .hostname("127.0.0.1")
//!         .port(3001)
//!         .middleware("/*", Middleware::new(logger))
//!         .get("/", home_handler)
//!         .get("/users/:userId", user_handler)
//!         .build()
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let service = Arc::new(RouterService::new(router()?));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!     let listener = TcpListener::bind(addr).await?;
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         let service = service.clone();
//!
//!         tokio::spawn(async move {
//!             let request_service = service.call(&stream).await.unwrap();
//!             let io = TokioIo::new(stream);
//!             let builder = Builder::new(TokioExecutor::new());
//!
//!             if let Err(err) = builder.serve_connection(io, request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler is a function or a closure taking the shared request and returning a future. Whatever the future
//! resolves to is converted into a [`Reply`](./enum.Reply.html):
//!
//! | Handler output | Reply |
//! |---|---|
//! | `()`, `None` | absent, answered with `404 Not found` |
//! | `&str`, `String` | text, sent as `text/plain;charset=UTF-8` |
//! | `serde_json::Value`, `serde_json::Map` | structured object, sent as `application/json` |
//! | `Response<Full<Bytes>>` | sent as is |
//!
//! ```
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use hyper::{Response, StatusCode};
//! use serde_json::json;
//! use switchyard::{Router, SharedRequest};
//!
//! async fn created(_: SharedRequest) -> Response<Full<Bytes>> {
//!     let mut res = Response::new(Full::new(Bytes::from("created")));
//!     *res.status_mut() = StatusCode::CREATED;
//!     res
//! }
//!
//! # fn run() -> switchyard::Result<Router> {
//! let router = Router::builder()
//!     .get("/text", |_| async move { "Hello" })
//!     .get("/json", |_| async move { json!({"message": "Hello"}) })
//!     .get("/maybe", |_| async move { None::<String> })
//!     .post("/items", created)
//!     .build()?;
//! # Ok(router)
//! # }
//! # run().unwrap();
//! ```
//!
//! ### Route Paths
//!
//! A path without `*`, `:`, `{` or `?` is literal. It is stored under every key of its equivalence class for
//! the configured hostname and port: with and without `http://` or `https://`, without the port when it is
//! canonical for the scheme, and under `localhost` and `127.0.0.1` alike.
//!
//! Anything else is a pattern:
//!
//! - `:name` captures one segment, `:name(regex)` a segment matching `regex`, `:name?` an optional segment.
//! - `(regex)` captures positionally, as `"0"`, `"1"`, ...
//! - `*` matches the rest of the path without capturing it.
//! - `{...}?` makes the enclosed text and captures optional.
//! - `\` escapes the next character.
//!
//! ```
//! use switchyard::prelude::*;
//! use switchyard::{Router, SharedRequest};
//!
//! async fn book(req: SharedRequest) -> String {
//!     format!("book {}", req.group("id").unwrap())
//! }
//!
//! # async fn run() -> switchyard::Result<()> {
//! let router = Router::builder().get(r"/book/:id(\d+)", book).build()?;
//!
//! let req = hyper::Request::get("http://localhost:8000/book/2023").body(bytes::Bytes::new()).unwrap();
//! assert!(router.resolve(req).await?.is_some());
//!
//! let req = hyper::Request::get("http://localhost:8000/book/Johnny").body(bytes::Bytes::new()).unwrap();
//! assert!(router.resolve(req).await?.is_none());
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(run()).unwrap();
//! ```
//!
//! Patterns are bucketed by their literal prefix, cut back to a `/` boundary, and tried in registration order.
//! A handler producing nothing lets the next pattern of the bucket try. A malformed pattern is an
//! [`Error::InvalidPattern`](./enum.Error.html) at registration.
//!
//! ### Handle 404 Pages
//!
//! [`Router::resolve`](./struct.Router.html#method.resolve) returns `Ok(None)` for an unresolved request, and
//! [`not_found`](./fn.not_found.html) builds the `404 Not found` answer.
//! [`RequestService`](./struct.RequestService.html) does this for you.
//!
//! ## Middleware
//!
//! A middleware is registered for a literal path or a pattern and applies regardless of the method. It takes the
//! request, a [`Next`](./struct.Next.html) and a [`Set`](./struct.Set.html):
//!
//! - `next` waits for the handler's result and returns it converted to the requested shape: text, JSON, a
//!   response or as is. The conversion is kept for later middleware.
//! - `set` replaces the result.
//!
//! Middleware run one after the other in registration order, while the handler runs once. The sequence of a
//! literal route is fixed when the route is registered, so declare middleware first.
//!
//! ```
//! use switchyard::{Middleware, Next, Router, Set, SharedRequest};
//!
//! async fn tag_a(_: SharedRequest, next: Next, set: Set) -> switchyard::Result<()> {
//!     let text = next.text().await?.unwrap_or_default();
//!     set.set(format!("(A) {}", text));
//!     Ok(())
//! }
//!
//! async fn tag_b(_: SharedRequest, next: Next, set: Set) -> switchyard::Result<()> {
//!     let text = next.text().await?.unwrap_or_default();
//!     set.set(format!("(B) {}", text));
//!     Ok(())
//! }
//!
//! # async fn run() -> switchyard::Result<()> {
//! let router = Router::builder()
//!     .middleware("/hello", Middleware::new(tag_a))
//!     .middleware("/*", Middleware::new(tag_b))
//!     .get("/hello", |_| async move { "Hello" })
//!     .build()?;
//!
//! let req = hyper::Request::get("http://localhost:8000/hello").body(bytes::Bytes::new()).unwrap();
//! let res = router.resolve(req).await?.unwrap();
//! # use http_body_util::BodyExt;
//! let body = res.into_body().collect().await.unwrap().to_bytes();
//! assert_eq!(body, "(B) (A) Hello");
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(run()).unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Registration returns [`Error::InvalidPattern`](./enum.Error.html) for a malformed path. A middleware may fail
//! with any error through [`Error::middleware`](./enum.Error.html#method.middleware), and asking `next` for an
//! unknown representation is an `Error::UnsupportedRepresentation`. Either one makes `resolve` fail, and
//! [`RequestService`](./struct.RequestService.html) answers with `500 Internal server error`.

pub use self::config::RouterConfig;
pub use self::error::{Error, RouteError};
pub use self::middleware::{Middleware, Next, Set};
pub use self::response::{not_found, to_response, Reply, Representation};
pub use self::route::{is_pattern, PatternMatcher, SharedRequest};
pub use self::router::{Router, RouterBuilder};
pub use self::service::{RequestService, RequestServiceBuilder, RouterService};
pub use self::types::{Method, RouteParams};

mod config;
mod constants;
mod error;
pub mod ext;
mod helpers;
mod middleware;
pub mod prelude;
mod regex_generator;
mod response;
mod route;
mod router;
mod service;
mod types;

/// A Result type often returned from methods that can have `switchyard` errors.
pub type Result<T> = std::result::Result<T, Error>;
