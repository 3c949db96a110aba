use crate::types::{RequestMeta, RouteParams};
use hyper::Request;
use lazy_static::lazy_static;
use std::net::SocketAddr;

lazy_static! {
    static ref NO_GROUPS: RouteParams = RouteParams::new();
}

/// A extension trait which extends the [`hyper::Request`](https://docs.rs/hyper/1.0.0/hyper/struct.Request.html)
/// type with the data the router attaches while dispatching.
pub trait RequestExt {
    /// The capture groups of the matched route, empty for literal routes.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchyard::prelude::*;
    /// use switchyard::{Router, SharedRequest};
    ///
    /// async fn handler(req: SharedRequest) -> String {
    ///     let groups = req.groups();
    ///     format!("{} / {}", groups.get("room").map(String::as_str).unwrap_or("-"), groups.get("id").unwrap())
    /// }
    ///
    /// # fn run() -> switchyard::Result<Router> {
    /// let router = Router::builder().get("/books{/archive/:room}?/:id", handler).build()?;
    /// # Ok(router)
    /// # }
    /// # run().unwrap();
    /// ```
    fn groups(&self) -> &RouteParams;

    /// A single capture group by name. Positional groups are named `"0"`, `"1"` and so on.
    fn group<P: AsRef<str>>(&self, name: P) -> Option<&String>;

    /// The peer address of the connection the request came in on, when it was received through a
    /// [`RequestService`](../struct.RequestService.html).
    fn remote_addr(&self) -> Option<SocketAddr>;
}

impl<B> RequestExt for Request<B> {
    fn groups(&self) -> &RouteParams {
        self.extensions().get::<RouteParams>().unwrap_or(&NO_GROUPS)
    }

    fn group<P: AsRef<str>>(&self, name: P) -> Option<&String> {
        self.groups().get(name)
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions().get::<RequestMeta>().and_then(RequestMeta::remote_addr)
    }
}
