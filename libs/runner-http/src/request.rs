use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, Uri};
use http_body_util::Full;
use serde::Serialize;

use crate::client::HttpClient;
use crate::config::SchemePolicy;
use crate::error::HttpError;
use crate::response::HttpResponse;
use crate::stack;

#[derive(Debug)]
enum Payload {
    None,
    Raw(Bytes),
    Json(Bytes),
}

/// A request being assembled. Created by [`HttpClient::get`] and
/// [`HttpClient::post`]; nothing goes out until [`send`](Self::send).
///
/// The first header or encoding error is kept and returned by `send`.
#[must_use = "a request does nothing until .send() is called"]
pub struct RequestBuilder {
    client: HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    payload: Payload,
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: Method, url: &str) -> Self {
        Self {
            client,
            method,
            url: url.to_owned(),
            headers: HeaderMap::new(),
            payload: Payload::None,
            error: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_none() {
            match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    self.headers.insert(name, value);
                }
                (Err(_), _) => {
                    self.error = Some(HttpError::InvalidHeader(format!("bad name '{name}'")));
                }
                (_, Err(_)) => {
                    self.error = Some(HttpError::InvalidHeader(format!("bad value for '{name}'")));
                }
            }
        }
        self
    }

    /// Serialize `value` as the JSON body.
    ///
    /// # Errors
    /// `HttpError::Encode` when `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, HttpError> {
        self.payload = Payload::Json(Bytes::from(serde_json::to_vec(value)?));
        Ok(self)
    }

    pub fn body(mut self, bytes: impl Into<Bytes>) -> Self {
        self.payload = Payload::Raw(bytes.into());
        self
    }

    /// Send the request and wait for the status line and headers.
    ///
    /// # Errors
    /// Any deferred builder error; `InvalidUrl` or `SchemeNotAllowed` for an
    /// unusable URL; `Transport` when the function cannot be reached;
    /// `Overloaded` when the request queue is full.
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let uri = target(&self.url, self.client.scheme_policy)?;

        let mut headers = self.headers;
        let body = match self.payload {
            Payload::None => Bytes::new(),
            Payload::Raw(bytes) => bytes,
            Payload::Json(bytes) => {
                headers
                    .entry(CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static("application/json"));
                bytes
            }
        };

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri)
            .body(Full::new(body))?;
        *request.headers_mut() = headers;

        tracing::debug!(
            method = %request.method(),
            url = %self.url,
            "sending request"
        );

        let mut client = self.client;
        let response = stack::dispatch(&mut client.stack, request).await?;
        Ok(HttpResponse::new(response, client.max_body_size))
    }
}

/// Parse an absolute URL and check its scheme against `policy`.
fn target(url: &str, policy: SchemePolicy) -> Result<Uri, HttpError> {
    let invalid = |reason: &str| HttpError::InvalidUrl {
        url: url.to_owned(),
        reason: reason.to_owned(),
    };

    let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
    let scheme = uri.scheme_str().ok_or_else(|| invalid("missing scheme"))?;
    if uri.host().is_none() {
        return Err(invalid("missing host"));
    }

    match (scheme, policy) {
        ("https", _) | ("http", SchemePolicy::AllowHttp) => Ok(uri),
        _ => Err(HttpError::SchemeNotAllowed(scheme.to_owned())),
    }
}
