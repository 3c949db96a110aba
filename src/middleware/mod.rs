use crate::response::Reply;
use crate::route::SharedRequest;
use bytes::Bytes;
use hyper::Request;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;
use std::sync::Arc;

pub use self::next::{Next, Set};
pub(crate) use self::pipeline::HandlerPipeline;
pub(crate) use self::registry::MiddlewareRegistry;

mod cell;
mod next;
mod pipeline;
mod registry;

type MiddlewareFn = Arc<dyn Fn(SharedRequest, Next, Set) -> MiddlewareReturn + Send + Sync + 'static>;
type MiddlewareReturn = Box<dyn Future<Output = crate::Result<()>> + Send + 'static>;

/// A compiled route handler: groups are injected and the middleware sequence is frozen into it.
pub(crate) type ReadyHandler = Arc<dyn Fn(Request<Bytes>) -> ReadyHandlerReturn + Send + Sync + 'static>;
pub(crate) type ReadyHandlerReturn = Box<dyn Future<Output = crate::Result<Reply>> + Send + 'static>;

/// A middleware step. Please refer to the [Middleware](./index.html#middleware) section for the protocol.
///
/// A step receives the request, a [`Next`](./struct.Next.html) to read the handler's result and a
/// [`Set`](./struct.Set.html) to replace it. It runs concurrently with the route handler, which is invoked
/// exactly once no matter how many steps read its result.
///
/// # Examples
///
/// ```
/// use switchyard::{Middleware, Next, Router, Set, SharedRequest};
///
/// async fn shout(_: SharedRequest, next: Next, set: Set) -> switchyard::Result<()> {
///     if let Some(text) = next.text().await? {
///         set.set(text.to_uppercase());
///     }
///     Ok(())
/// }
///
/// # fn run() -> switchyard::Result<Router> {
/// let router = Router::builder()
///     .middleware("/greet/*", Middleware::new(shout))
///     .get("/greet/:name", |_| async move { "hello" })
///     .build()?;
/// # Ok(router)
/// # }
/// # run().unwrap();
/// ```
#[derive(Clone)]
pub struct Middleware {
    handler: MiddlewareFn,
}

impl Middleware {
    pub fn new<H, R>(handler: H) -> Middleware
    where
        H: Fn(SharedRequest, Next, Set) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<()>> + Send + 'static,
    {
        let handler: MiddlewareFn = Arc::new(move |req, next, set| Box::new(handler(req, next, set)));
        Middleware { handler }
    }

    pub(crate) async fn process(&self, req: SharedRequest, next: Next, set: Set) -> crate::Result<()> {
        Pin::from((self.handler)(req, next, set)).await
    }
}

impl Debug for Middleware {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware")
    }
}

/// A registered middleware with its global registration id.
#[derive(Debug, Clone)]
pub(crate) struct MiddlewareEntry {
    pub(crate) id: u64,
    pub(crate) middleware: Middleware,
}

/// The id-ordered middleware list a route was compiled with. Never updated afterwards.
#[derive(Debug, Clone)]
pub(crate) struct EffectiveSequence(Arc<[MiddlewareEntry]>);

impl EffectiveSequence {
    pub(crate) fn new(mut entries: Vec<MiddlewareEntry>) -> EffectiveSequence {
        entries.sort_by_key(|entry| entry.id);
        EffectiveSequence(entries.into())
    }

    pub(crate) fn ids(&self) -> Vec<u64> {
        self.0.iter().map(|entry| entry.id).collect()
    }
}

impl Deref for EffectiveSequence {
    type Target = [MiddlewareEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
