use http::Method;

use crate::builder::HttpClientBuilder;
use crate::config::SchemePolicy;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::stack::Stack;

/// Pooled HTTPS client.
///
/// Cheap to clone; clones share the connection pool and the request queue,
/// so hold it directly rather than behind a lock.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) stack: Stack,
    pub(crate) max_body_size: usize,
    pub(crate) scheme_policy: SchemePolicy,
}

impl HttpClient {
    /// Client with default settings.
    ///
    /// # Errors
    /// Returns `HttpError::Tls` when the root certificates cannot be loaded.
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// GET `url`. The URL must be absolute.
    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::GET, url)
    }

    /// POST to `url`.
    ///
    /// ```ignore
    /// let reply = client
    ///     .post("https://functions.example.com/api/sum")
    ///     .json(&serde_json::json!({ "num1": 3.0, "num2": 4.0 }))?
    ///     .send()
    ///     .await?;
    /// ```
    pub fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::POST, url)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_body_size", &self.max_body_size)
            .field("scheme_policy", &self.scheme_policy)
            .finish_non_exhaustive()
    }
}
