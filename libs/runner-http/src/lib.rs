#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP client used to call remote functions.
//!
//! Built on hyper with rustls. Every request passes through one tower stack:
//! a bounded request queue, a default `User-Agent`, response decompression
//! (gzip, brotli, deflate) and redirect following, over a pooled connection.
//! Plain `http://` is refused unless the client opts in.
//!
//! Any HTTP status is returned as a reply; interpreting it is up to the
//! caller. There is no timeout and no retry.
//!
//! ```ignore
//! use runner_http::HttpClient;
//!
//! let client = HttpClient::new()?;
//! let reply = client
//!     .post("https://functions.example.com/api/sum")
//!     .json(&serde_json::json!({ "num1": 3.0, "num2": 4.0 }))?
//!     .send()
//!     .await?;
//! let (status, body) = (reply.status(), reply.bytes().await?);
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
mod stack;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{
    ClientConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, SchemePolicy,
    TlsRoots,
};
pub use error::{BoxError, HttpError};
pub use request::RequestBuilder;
pub use response::HttpResponse;
pub use stack::ResponseBody;
