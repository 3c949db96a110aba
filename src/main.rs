use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use switchyard::prelude::*;
use switchyard::{Middleware, Next, Router, RouterService, Set, SharedRequest};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const PORT: u16 = 8000;

async fn home(_: SharedRequest) -> &'static str {
    "Home page"
}

async fn book(req: SharedRequest) -> serde_json::Value {
    json!({ "id": req.group("id"), "room": req.group("room") })
}

// Logs every request once the handler has answered.
async fn access_log(req: SharedRequest, next: Next, _: Set) -> switchyard::Result<()> {
    let reply = next.reply().await?;
    tracing::info!(
        method = %req.method(),
        path = req.uri().path(),
        remote_addr = ?req.remote_addr(),
        shape = ?reply.representation(),
        "handled request"
    );
    Ok(())
}

async fn wrap_books(_: SharedRequest, next: Next, set: Set) -> switchyard::Result<()> {
    if let Some(book) = next.json().await? {
        set.set(json!({ "book": book }));
    }
    Ok(())
}

fn router() -> switchyard::Result<Router> {
    Router::builder()
        .port(PORT)
        .middleware("/*", Middleware::new(access_log))
        .middleware("/books/*", Middleware::new(wrap_books))
        .get("/", home)
        .get(r"/books{/archive/:room}?/:id(\d+)", book)
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let service = Arc::new(RouterService::new(router()?));

    let addr = SocketAddr::from(([127, 0, 0, 1], PORT));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, _) = match accepted {
                    Ok(conn) => conn,
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to accept connection");
                        continue;
                    }
                };

                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let request_service = match service.call(&stream).await {
                        Ok(request_service) => request_service,
                        Err(never) => match never {},
                    };

                    let io = TokioIo::new(stream);
                    let builder = Builder::new(TokioExecutor::new());
                    if let Err(err) = builder.serve_connection(io, request_service).await {
                        tracing::warn!(error = %err, "error serving connection");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
