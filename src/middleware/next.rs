use super::cell::ResponseCell;
use crate::response::{Reply, Representation};
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use serde_json::Value;
use std::sync::Arc;

/// Gives a middleware step access to the route handler's result.
///
/// Every read waits until the handler has produced its result, then returns the current reply coerced to the
/// requested representation. The coerced reply is written back, so later steps observe the converted shape.
/// Reading never runs the handler again.
#[derive(Clone)]
pub struct Next {
    cell: Arc<ResponseCell>,
}

impl Next {
    pub(crate) fn new(cell: Arc<ResponseCell>) -> Next {
        Next { cell }
    }

    /// The current reply, as is.
    pub async fn reply(&self) -> crate::Result<Reply> {
        self.to(Representation::Unknown).await
    }

    /// The current reply converted to `repr`.
    pub async fn to(&self, repr: Representation) -> crate::Result<Reply> {
        self.cell.wait_ready().await;

        let current = self.cell.snapshot();
        if repr == Representation::Unknown || current.representation() == Some(repr) {
            return Ok(current);
        }

        let coerced = current.coerce(repr).await?;
        self.cell.overwrite(coerced.clone());
        Ok(coerced)
    }

    /// The current reply converted to the representation named by `label`: `"string"`, `"json"`, `"response"`
    /// or `"unknown"`.
    ///
    /// Any other label is an [`Error::UnsupportedRepresentation`](./enum.Error.html).
    pub async fn to_label(&self, label: &str) -> crate::Result<Reply> {
        let repr = label.parse::<Representation>()?;
        self.to(repr).await
    }

    /// The current reply as text. `None` if the handler produced nothing.
    pub async fn text(&self) -> crate::Result<Option<String>> {
        match self.to(Representation::Text).await? {
            Reply::Text(text) => Ok(Some(text)),
            _ => Ok(None),
        }
    }

    /// The current reply as a structured object. `None` if the handler produced nothing.
    pub async fn json(&self) -> crate::Result<Option<Value>> {
        match self.to(Representation::Json).await? {
            Reply::Json(value) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// The current reply as a response object. `None` if the handler produced nothing.
    pub async fn response(&self) -> crate::Result<Option<Response<Full<Bytes>>>> {
        match self.to(Representation::Response).await? {
            Reply::Response(res) => Ok(Some(res)),
            _ => Ok(None),
        }
    }
}

/// Lets a middleware step replace the current reply.
///
/// The replacement is immediate and the last one wins. A value set while the handler is still running takes
/// the place of the handler's result, which is then discarded.
#[derive(Clone)]
pub struct Set {
    cell: Arc<ResponseCell>,
}

impl Set {
    pub(crate) fn new(cell: Arc<ResponseCell>) -> Set {
        Set { cell }
    }

    pub fn set<R: Into<Reply>>(&self, value: R) {
        self.cell.overwrite(value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn filled(reply: Reply) -> (Next, Set, Arc<ResponseCell>) {
        let cell = Arc::new(ResponseCell::new());
        cell.fill(reply);
        (Next::new(cell.clone()), Set::new(cell.clone()), cell)
    }

    #[tokio::test]
    async fn should_write_coercion_back() {
        let (next, _, cell) = filled(Reply::from("Hello"));

        assert_eq!(next.json().await.unwrap().unwrap(), json!({"data": "Hello"}));
        assert!(matches!(cell.snapshot(), Reply::Json(_)));

        // Converted back through the structured form.
        assert_eq!(next.text().await.unwrap().unwrap(), r#"{"data":"Hello"}"#);
    }

    #[tokio::test]
    async fn should_return_reply_as_is_for_unknown() {
        let (next, _, _) = filled(Reply::from(json!([1, 2])));
        assert!(matches!(next.to_label("unknown").await.unwrap(), Reply::Json(_)));
        assert!(matches!(next.reply().await.unwrap(), Reply::Json(_)));
    }

    #[tokio::test]
    async fn should_reject_unsupported_labels() {
        let (next, _, _) = filled(Reply::from("Hello"));
        let err = next.to_label("xml").await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedRepresentation(ref label) if label == "xml"));
    }

    #[tokio::test]
    async fn should_replace_the_reply() {
        let (next, set, _) = filled(Reply::from("Hello"));
        set.set(json!({"replaced": true}));
        assert_eq!(next.json().await.unwrap().unwrap(), json!({"replaced": true}));
    }

    #[tokio::test]
    async fn should_yield_none_for_absent_reply() {
        let (next, _, _) = filled(Reply::Absent);
        assert!(next.text().await.unwrap().is_none());
        assert!(next.response().await.unwrap().is_none());
    }
}
