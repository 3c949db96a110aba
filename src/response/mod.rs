use crate::constants::{INTERNAL_ERROR_BODY, NOT_FOUND_BODY};
use crate::Error;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde_json::{Map, Value};
use std::future::{ready, IntoFuture, Ready};
use std::str::FromStr;

pub use self::coercion::to_response;

mod coercion;

/// The canonical shape of whatever a handler or a middleware produced.
///
/// Handlers may return anything that converts into a `Reply`: `()` or `None` for no response, a string, a JSON
/// value or map, or a ready-made response. Middleware read the current reply through
/// [`Next`](./struct.Next.html) and replace it through [`Set`](./struct.Set.html).
#[derive(Debug, Default)]
pub enum Reply {
    /// No response was produced. Resolves to not found at the boundary.
    #[default]
    Absent,
    Text(String),
    /// A structured object, JSON encoded at the boundary.
    Json(Value),
    Response(Response<Full<Bytes>>),
}

impl Reply {
    pub fn is_absent(&self) -> bool {
        matches!(self, Reply::Absent)
    }

    /// The shape of the reply, as a representation.
    pub fn representation(&self) -> Option<Representation> {
        match self {
            Reply::Absent => None,
            Reply::Text(_) => Some(Representation::Text),
            Reply::Json(_) => Some(Representation::Json),
            Reply::Response(_) => Some(Representation::Response),
        }
    }
}

impl Clone for Reply {
    fn clone(&self) -> Self {
        match self {
            Reply::Absent => Reply::Absent,
            Reply::Text(text) => Reply::Text(text.clone()),
            Reply::Json(value) => Reply::Json(value.clone()),
            Reply::Response(res) => Reply::Response(clone_response(res)),
        }
    }
}

// Extensions are not carried over, they are not `Clone`.
fn clone_response(res: &Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let mut cloned = Response::new(res.body().clone());
    *cloned.status_mut() = res.status();
    *cloned.version_mut() = res.version();
    *cloned.headers_mut() = res.headers().clone();
    cloned
}

impl IntoFuture for Reply {
    type Output = Reply;
    type IntoFuture = Ready<Reply>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self)
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Absent
    }
}

impl<T: Into<Reply>> From<Option<T>> for Reply {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_owned())
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Json(value)
    }
}

impl From<Map<String, Value>> for Reply {
    fn from(map: Map<String, Value>) -> Self {
        Reply::Json(Value::Object(map))
    }
}

impl From<Response<Full<Bytes>>> for Reply {
    fn from(res: Response<Full<Bytes>>) -> Self {
        Reply::Response(res)
    }
}

/// The representation a middleware can ask `next` for.
///
/// Parsed from the labels `"string"`, `"json"`, `"response"` and `"unknown"`. `Unknown` leaves the reply as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    Text,
    Json,
    Response,
    Unknown,
}

impl Representation {
    pub fn label(&self) -> &'static str {
        match self {
            Representation::Text => "string",
            Representation::Json => "json",
            Representation::Response => "response",
            Representation::Unknown => "unknown",
        }
    }
}

impl FromStr for Representation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Representation::Text),
            "json" => Ok(Representation::Json),
            "response" => Ok(Representation::Response),
            "unknown" => Ok(Representation::Unknown),
            _ => Err(Error::UnsupportedRepresentation(s.to_owned())),
        }
    }
}

/// The response every unresolved request gets: status 404 with the body `Not found`.
pub fn not_found() -> Response<Full<Bytes>> {
    status_response(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

pub(crate) fn internal_error() -> Response<Full<Bytes>> {
    status_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
}

fn status_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut res = coercion::text_response(body.to_owned());
    *res.status_mut() = status;
    res
}
