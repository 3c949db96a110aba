#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::Service;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::net::SocketAddr;
use std::sync::Arc;
use switchyard::{Router, RouterService};
use tokio::net::TcpListener;
use tokio::sync::oneshot::{self, Sender};

pub struct Serve {
    addr: SocketAddr,
    service: Arc<RouterService>,
    tx: Sender<()>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn router(&self) -> &Router {
        self.service.router()
    }

    pub fn url(&self, route: &str) -> String {
        format!("http://{}{}", self.addr(), route)
    }

    pub fn shutdown(self) {
        self.tx.send(()).unwrap();
    }
}

/// Binds an ephemeral port first, so the router can be registered under it.
pub async fn serve<F>(build: F) -> Serve
where
    F: FnOnce(u16) -> Router,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Arc::new(RouterService::new(build(addr.port())));
    let (tx, mut rx) = oneshot::channel::<()>();

    let accept_service = service.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, _) = accepted.unwrap();
                    let service = accept_service.clone();
                    tokio::spawn(async move {
                        let request_service = service.call(&stream).await.unwrap();
                        let io = TokioIo::new(stream);
                        let builder = Builder::new(TokioExecutor::new());
                        let _ = builder.serve_connection(io, request_service).await;
                    });
                }
                _ = &mut rx => break,
            }
        }
    });

    Serve { addr, service, tx }
}

pub fn request(method: &str, url: &str) -> Request<Bytes> {
    Request::builder()
        .method(method.to_ascii_uppercase().as_str())
        .uri(url)
        .body(Bytes::new())
        .unwrap()
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::fmt::Debug,
{
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}

pub async fn text_of(res: Response<Full<Bytes>>) -> String {
    into_text(res.into_body()).await
}
