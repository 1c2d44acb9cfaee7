use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::{BodyExt, Collected, LengthLimitError, Limited};

use crate::error::{BoxError, HttpError};
use crate::stack::ResponseBody;

/// A reply whose status and headers have arrived. The body is read at most
/// once, up to the client's size limit.
#[derive(Debug)]
pub struct HttpResponse {
    inner: Response<ResponseBody>,
    max_body_size: usize,
}

impl HttpResponse {
    pub(crate) fn new(inner: Response<ResponseBody>, max_body_size: usize) -> Self {
        Self {
            inner,
            max_body_size,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Read the whole (decompressed) body.
    ///
    /// # Errors
    /// `BodyTooLarge` past the size limit, `Transport` if the connection
    /// drops mid-body.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        let limit = self.max_body_size;
        // Boxed as `dyn Future + Send` so callers' futures stay provably `Send`.
        let collect: Pin<Box<dyn Future<Output = Result<Collected<Bytes>, BoxError>> + Send>> =
            Box::pin(Limited::new(self.inner.into_body(), limit).collect());
        let collected = collect
            .await
            .map_err(|err| {
                if err.is::<LengthLimitError>() {
                    HttpError::BodyTooLarge { limit }
                } else {
                    HttpError::Transport(err)
                }
            })?;
        Ok(collected.to_bytes())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http_body_util::Full;

    fn reply(body: &'static str, limit: usize) -> HttpResponse {
        let body = Full::new(Bytes::from_static(body.as_bytes()))
            .map_err(|never| match never {})
            .boxed_unsync();
        HttpResponse::new(Response::new(body), limit)
    }

    #[tokio::test]
    async fn body_within_limit() {
        let bytes = reply(r#"{"sum":7}"#, 64).bytes().await.unwrap();
        assert_eq!(bytes.as_ref(), br#"{"sum":7}"#);
    }

    #[tokio::test]
    async fn body_over_limit() {
        let err = reply("0123456789", 4).bytes().await.unwrap_err();
        assert!(matches!(err, HttpError::BodyTooLarge { limit: 4 }));
    }
}
