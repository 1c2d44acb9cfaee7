use thiserror::Error;

/// Boxed error from the layers below the client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors of building, sending or reading a request.
///
/// A reply with a non-2xx status is not an error here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("URL scheme '{0}' is not allowed")]
    SchemeNotAllowed(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    /// Connecting, sending or reading the body failed
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] BoxError),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The request queue is full; nothing was sent
    #[error("request queue is full")]
    Overloaded,

    #[error("client worker stopped")]
    Closed,
}
