use thiserror::Error;

/// A boxed error type used at the hyper service boundary, where body and connection errors of any type
/// have to be carried through a single `Service::Error`.
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type used by the router, the route patterns and the middleware pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A route or middleware path could not be compiled. Raised at registration time.
    #[error("Invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A middleware asked `next` for a representation that does not exist.
    #[error("Unsupported response representation: {0:?}")]
    UnsupportedRepresentation(String),

    /// The method is not part of the closed set the router dispatches on.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Could not encode the response as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A middleware failed with its own error.
    #[error("Middleware failed: {0}")]
    Middleware(#[source] RouteError),

    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a plain error from a message.
    pub fn new<M: Into<String>>(msg: M) -> Error {
        Error::Message(msg.into())
    }

    /// Wraps any error raised by a middleware so it can be propagated with `?`.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchyard::Error;
    ///
    /// let err = Error::middleware(std::io::Error::new(std::io::ErrorKind::Other, "backend is down"));
    /// assert_eq!(err.to_string(), "Middleware failed: backend is down");
    /// ```
    pub fn middleware<E: Into<RouteError>>(err: E) -> Error {
        Error::Middleware(err.into())
    }

    pub(crate) fn invalid_pattern<P: Into<String>, R: Into<String>>(pattern: P, reason: R) -> Error {
        Error::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
