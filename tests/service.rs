use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::{json, Value};
use switchyard::prelude::*;
use switchyard::{Method, Router, SharedRequest};

mod support;

use self::support::{into_text, serve};

fn client() -> Client<hyper_util::client::legacy::connect::HttpConnector, Full<Bytes>> {
    Client::builder(TokioExecutor::new()).build_http()
}

async fn echo(req: SharedRequest) -> Value {
    json!({
        "user": req.group("user"),
        "body": String::from_utf8_lossy(req.body()),
        "peer_is_loopback": req.remote_addr().map(|addr| addr.ip().is_loopback()),
    })
}

#[tokio::test]
async fn should_serve_routes_over_http() {
    let serve = serve(|port| {
        Router::builder()
            .hostname("127.0.0.1")
            .port(port)
            .get("/", |_| async move { "Home page" })
            .post("/users/:user", echo)
            .build()
            .unwrap()
    })
    .await;

    let client = client();

    let res = client.get(serve.url("/").parse().unwrap()).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/plain;charset=UTF-8");
    assert_eq!(into_text(res.into_body()).await, "Home page");

    let req = Request::post(serve.url("/users/alice"))
        .body(Full::new(Bytes::from("payload")))
        .unwrap();
    let res = client.request(req).await.unwrap();
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = serde_json::from_str(&into_text(res.into_body()).await).unwrap();
    assert_eq!(
        body,
        json!({ "user": "alice", "body": "payload", "peer_is_loopback": true })
    );

    serve.shutdown();
}

#[tokio::test]
async fn should_answer_not_found_over_http() {
    let serve = serve(|port| {
        Router::builder()
            .port(port)
            .get("/exists", |_| async move { "here" })
            .get("/empty", |_| async move {})
            .build()
            .unwrap()
    })
    .await;

    let client = client();
    for route in ["/missing", "/empty", "/exists/deeper"] {
        let res = client.get(serve.url(route).parse().unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", route);
        assert_eq!(into_text(res.into_body()).await, "Not found");
    }

    let req = Request::delete(serve.url("/exists")).body(Full::new(Bytes::new())).unwrap();
    let res = client.request(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    serve.shutdown();
}

#[tokio::test]
async fn should_pick_up_routes_registered_while_serving() {
    let serve = serve(|port| Router::builder().port(port).build().unwrap()).await;
    let client = client();

    let res = client.get(serve.url("/late").parse().unwrap()).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    serve.router().get("/late", |_| async move { "registered" }).unwrap();
    let res = client.get(serve.url("/late").parse().unwrap()).await.unwrap();
    assert_eq!(into_text(res.into_body()).await, "registered");

    assert!(serve.router().unregister(Method::Get, "/late"));
    let res = client.get(serve.url("/late").parse().unwrap()).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    serve.shutdown();
}
