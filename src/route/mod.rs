use crate::middleware::ReadyHandler;
use crate::response::Reply;
use bytes::Bytes;
use hyper::Request;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

pub use self::pattern::{is_pattern, PatternMatcher};

mod pattern;

/// The request as handlers and middleware see it.
///
/// It is shared, because the handler and the middleware chain of a route observe the same request concurrently.
/// Capture groups and request metadata live in its extensions, use the [`RequestExt`](./ext/trait.RequestExt.html)
/// methods to read them.
pub type SharedRequest = Arc<Request<Bytes>>;

pub(crate) type Handler = Arc<dyn Fn(SharedRequest) -> HandlerReturn + Send + Sync + 'static>;
pub(crate) type HandlerReturn = Box<dyn Future<Output = Reply> + Send + 'static>;

pub(crate) fn boxed_handler<H, R, O>(handler: H) -> Handler
where
    H: Fn(SharedRequest) -> R + Send + Sync + 'static,
    R: Future<Output = O> + Send + 'static,
    O: Into<Reply> + 'static,
{
    Arc::new(move |req: SharedRequest| {
        let fut = handler(req);
        Box::new(async move {
            let reply: Reply = fut.await.into();
            reply
        })
    })
}

/// A compiled literal route, stored under every key of its equivalence class.
#[derive(Clone)]
pub(crate) struct LiteralRoute {
    pub(crate) handler: ReadyHandler,
    // Id of the pattern route this fast path was memoized from.
    pub(crate) origin: Option<u64>,
}

impl LiteralRoute {
    pub(crate) fn new(handler: ReadyHandler, origin: Option<u64>) -> LiteralRoute {
        LiteralRoute { handler, origin }
    }
}

impl Debug for LiteralRoute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ origin: {:?} }}", self.origin)
    }
}

/// A route registered with a pattern path. It only becomes invokable once a concrete path matched it.
#[derive(Clone)]
pub(crate) struct PatternRoute {
    pub(crate) id: u64,
    pub(crate) matcher: PatternMatcher,
    pub(crate) handler: Handler,
}

impl PatternRoute {
    pub(crate) fn new(id: u64, matcher: PatternMatcher, handler: Handler) -> PatternRoute {
        PatternRoute { id, matcher, handler }
    }

    pub(crate) fn path(&self) -> &str {
        self.matcher.path()
    }
}

impl Debug for PatternRoute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ id: {}, matcher: {:?} }}", self.id, self.matcher)
    }
}
