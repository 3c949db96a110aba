use crate::router::Router;
use crate::service::request_service::{RequestService, RequestServiceBuilder};
use hyper::service::Service;
use std::convert::Infallible;
use std::future::{ready, Ready};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// A [`Service`](https://docs.rs/hyper/1.0.0/hyper/service/trait.Service.html) yielding one
/// [RequestService](./struct.RequestService.html) per accepted connection.
///
/// # Examples
///
/// ```no_run
/// use hyper::service::Service;
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use switchyard::{Router, RouterService};
/// use std::net::SocketAddr;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let router = Router::builder().port(3001).get("/", |_| async move { "Home page" }).build()?;
///
///     // Create a Service from the router above to handle incoming requests.
///     let service = Arc::new(RouterService::new(router));
///
///     let addr: SocketAddr = SocketAddr::from(([127, 0, 0, 1], 3001));
///     let listener = TcpListener::bind(addr).await?;
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let router_service = service.clone();
///
///         tokio::spawn(async move {
///             let request_service = router_service.call(&stream).await.unwrap();
///             let io = TokioIo::new(stream);
///
///             let builder = Builder::new(TokioExecutor::new());
///             if let Err(err) = builder.serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RouterService {
    builder: RequestServiceBuilder,
}

impl RouterService {
    pub fn new(router: Router) -> RouterService {
        RouterService {
            builder: RequestServiceBuilder::new(router),
        }
    }

    /// The router being served. Routes and middleware can still be registered through it.
    pub fn router(&self) -> &Arc<Router> {
        self.builder.router()
    }
}

impl Service<&TcpStream> for RouterService {
    type Response = RequestService;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = match conn.peer_addr() {
            Ok(addr) => addr,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        };

        ready(Ok(self.builder.build(addr)))
    }
}
