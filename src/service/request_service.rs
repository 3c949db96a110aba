use crate::error::RouteError;
use crate::response::{internal_error, not_found};
use crate::router::Router;
use crate::types::RequestMeta;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{service::Service, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// Serves the requests of one connection through a shared [Router](./struct.Router.html).
///
/// The request body is collected before dispatching. An unresolved request is answered with `404 Not found`, a
/// failing middleware with `500 Internal server error`.
#[derive(Debug)]
pub struct RequestService {
    pub(crate) router: Arc<Router>,
    pub(crate) remote_addr: SocketAddr,
}

impl<T> Service<Request<T>> for RequestService
where
    T: Body + Send + 'static,
    T::Data: Send,
    T::Error: Into<RouteError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = RouteError;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<T>) -> Self::Future {
        Box::pin(serve(self.router.clone(), self.remote_addr, req))
    }
}

async fn serve<T>(
    router: Arc<Router>,
    remote_addr: SocketAddr,
    req: Request<T>,
) -> Result<Response<Full<Bytes>>, RouteError>
where
    T: Body,
    T::Error: Into<RouteError>,
{
    let (parts, body) = req.into_parts();
    let body = body.collect().await.map_err(Into::<RouteError>::into)?.to_bytes();

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(RequestMeta::with_remote_addr(remote_addr));

    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match router.resolve(req).await {
        Ok(Some(res)) => Ok(res),
        Ok(None) => {
            tracing::trace!(%method, path = %path, %remote_addr, "not found");
            Ok(not_found())
        }
        Err(err) => {
            tracing::error!(%method, path = %path, %remote_addr, error = %err, "request pipeline failed");
            Ok(internal_error())
        }
    }
}

/// Creates one [RequestService](./struct.RequestService.html) per connection over a shared router.
#[derive(Debug, Clone)]
pub struct RequestServiceBuilder {
    router: Arc<Router>,
}

impl RequestServiceBuilder {
    pub fn new(router: Router) -> Self {
        RequestServiceBuilder::from_shared(Arc::new(router))
    }

    pub fn from_shared(router: Arc<Router>) -> Self {
        Self { router }
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }
}
