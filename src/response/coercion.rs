use super::{Reply, Representation};
use crate::constants::{JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE, WRAPPED_TEXT_KEY};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::Response;
use serde_json::{Map, Value};
use std::future::IntoFuture;

impl Reply {
    /// Converts the reply into the requested representation.
    ///
    /// | from \ to  | text           | json                          | response         |
    /// |------------|----------------|-------------------------------|------------------|
    /// | text       | itself         | parsed, else `{"data": text}` | text body        |
    /// | response   | body as text   | body parsed, else wrapped     | itself           |
    /// | json       | stringified    | itself                        | JSON body        |
    /// | absent     | absent         | absent                        | absent           |
    pub async fn coerce(self, to: Representation) -> crate::Result<Reply> {
        let coerced = match to {
            Representation::Text => self.into_text().await?.map(Reply::Text),
            Representation::Json => self.into_json().await?.map(Reply::Json),
            Representation::Response => self.into_response()?.map(Reply::Response),
            Representation::Unknown => Some(self),
        };

        Ok(coerced.unwrap_or_default())
    }

    /// The reply as text. Response bodies that are not valid UTF-8 are decoded lossily.
    pub async fn into_text(self) -> crate::Result<Option<String>> {
        match self {
            Reply::Absent => Ok(None),
            Reply::Text(text) => Ok(Some(text)),
            Reply::Json(value) => Ok(Some(serde_json::to_string(&value)?)),
            Reply::Response(res) => {
                let body = read_body(res).await;
                Ok(Some(String::from_utf8_lossy(&body).into_owned()))
            }
        }
    }

    /// The reply as a structured object.
    ///
    /// Text that is not JSON is wrapped under `"data"`. A response body which is not valid UTF-8 is wrapped as
    /// `{"data": null}`.
    pub async fn into_json(self) -> crate::Result<Option<Value>> {
        match self {
            Reply::Absent => Ok(None),
            Reply::Json(value) => Ok(Some(value)),
            Reply::Text(text) => Ok(Some(parse_or_wrap(Some(text)))),
            Reply::Response(res) => {
                let body = read_body(res).await;
                Ok(Some(parse_or_wrap(String::from_utf8(body.to_vec()).ok())))
            }
        }
    }

    /// The reply as a response object.
    pub fn into_response(self) -> crate::Result<Option<Response<Full<Bytes>>>> {
        match self {
            Reply::Absent => Ok(None),
            Reply::Response(res) => Ok(Some(res)),
            Reply::Text(text) => Ok(Some(text_response(text))),
            Reply::Json(value) => Ok(Some(json_response(&value)?)),
        }
    }
}

/// Turns a handler or pipeline outcome into the response sent back to the client.
///
/// Pending values are awaited first. `None` means no response was produced and the caller should answer with
/// [`not_found`](./fn.not_found.html).
///
/// # Examples
///
/// ```
/// use http_body_util::BodyExt;
/// use serde_json::json;
/// use switchyard::{to_response, Reply};
///
/// # async fn run() -> switchyard::Result<()> {
/// let res = to_response(Reply::from(json!({"a": 1}))).await?.unwrap();
/// assert_eq!(res.headers()["content-type"], "application/json");
///
/// let body = res.into_body().collect().await.unwrap().to_bytes();
/// assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap(), json!({"a": 1}));
///
/// assert!(to_response(async { Reply::Absent }).await?.is_none());
/// # Ok(())
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(run()).unwrap();
/// ```
pub async fn to_response<V>(value: V) -> crate::Result<Option<Response<Full<Bytes>>>>
where
    V: IntoFuture<Output = Reply>,
{
    value.await.into_response()
}

pub(crate) fn text_response(text: String) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(text)));
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE));
    res
}

fn json_response(value: &Value) -> crate::Result<Response<Full<Bytes>>> {
    let body = serde_json::to_vec(value)?;
    let mut res = Response::new(Full::new(Bytes::from(body)));
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    Ok(res)
}

fn parse_or_wrap(text: Option<String>) -> Value {
    if let Some(Ok(value)) = text.as_deref().map(serde_json::from_str::<Value>) {
        return value;
    }

    let mut wrapped = Map::with_capacity(1);
    wrapped.insert(WRAPPED_TEXT_KEY.to_owned(), text.map(Value::String).unwrap_or(Value::Null));
    Value::Object(wrapped)
}

async fn read_body(res: Response<Full<Bytes>>) -> Bytes {
    // `Full` never fails to yield its single frame.
    match res.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    }
}
