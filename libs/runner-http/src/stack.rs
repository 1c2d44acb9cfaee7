//! The tower service every request passes through.

use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::Poll;

use bytes::Bytes;
use http::header::USER_AGENT;
use http::{HeaderValue, Request, Response};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::buffer::Buffer;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;
use tower_http::follow_redirect::FollowRedirectLayer;
use tower_http::follow_redirect::policy::Limited;
use tower_http::set_header::SetRequestHeaderLayer;

use crate::config::ClientConfig;
use crate::error::{BoxError, HttpError};
use crate::tls;

/// Response body after decompression.
pub type ResponseBody = UnsyncBoxBody<Bytes, BoxError>;

type StackFuture = Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Cloneable handle to the queued service stack.
pub(crate) type Stack = Buffer<Request<Full<Bytes>>, StackFuture>;

/// Assemble the stack, outermost first:
/// queue, default User-Agent, decompression, redirects, pooled hyper client.
///
/// Every HTTP status comes back as a response. There is no timeout and no
/// retry layer.
pub(crate) fn build(config: &ClientConfig) -> Result<Stack, HttpError> {
    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| HttpError::InvalidHeader(format!("user-agent: {e}")))?;
    let connector = tls::https_connector(config.tls_roots, config.scheme_policy)?;

    let mut pool = Client::builder(TokioExecutor::new());
    // idle timeout needs the timer
    pool.pool_timer(TokioTimer::new())
        .pool_idle_timeout(config.idle_timeout);
    let client = pool.build::<_, Full<Bytes>>(connector);

    let service = ServiceBuilder::new()
        .layer(SetRequestHeaderLayer::if_not_present(USER_AGENT, user_agent))
        .layer(DecompressionLayer::new())
        .layer(FollowRedirectLayer::with_policy(Limited::new(
            config.max_redirects,
        )))
        .service(client)
        .map_response(box_body)
        .map_err(|err| HttpError::Transport(Box::new(err)))
        .boxed();

    Ok(Buffer::new(service, config.queue_depth.max(1)))
}

fn box_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    response.map(|body| body.map_err(Into::into).boxed_unsync())
}

/// Send `request` through the stack. A full queue fails fast with
/// [`HttpError::Overloaded`] instead of waiting.
pub(crate) async fn dispatch(
    stack: &mut Stack,
    request: Request<Full<Bytes>>,
) -> Result<Response<ResponseBody>, HttpError> {
    let ready = poll_fn(|cx| {
        Poll::Ready(match stack.poll_ready(cx) {
            Poll::Ready(result) => Some(result),
            Poll::Pending => None,
        })
    })
    .await;

    match ready {
        Some(Ok(())) => stack.call(request).await.map_err(from_buffer_error),
        Some(Err(err)) => Err(from_buffer_error(err)),
        None => Err(HttpError::Overloaded),
    }
}

/// The queue passes the stack's own `HttpError` through boxed; anything else
/// means its worker is gone.
fn from_buffer_error(err: BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(err) => *err,
        Err(err) => {
            tracing::error!(error = %err, "request worker stopped");
            HttpError::Closed
        }
    }
}
