//! Client settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User-Agent sent when the caller sets none.
pub const DEFAULT_USER_AGENT: &str = concat!("function-runner-http/", env!("CARGO_PKG_VERSION"));

/// Largest response body read into memory (1 MiB). Function replies are tiny.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Redirect hops followed before the 3xx reply is handed back as is.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Where trusted root certificates come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsRoots {
    /// Bundled Mozilla roots
    #[default]
    WebPki,
    /// The operating system's trust store
    Native,
}

/// URL schemes a request may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemePolicy {
    #[default]
    HttpsOnly,
    /// Plain `http://` too; for mock servers
    AllowHttp,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub max_body_size: usize,
    pub tls_roots: TlsRoots,
    pub scheme_policy: SchemePolicy,
    /// `0` hands every 3xx back unfollowed
    pub max_redirects: usize,
    /// Requests that may wait for the worker before `send` reports `Overloaded`
    pub queue_depth: usize,
    /// How long an unused pooled connection is kept; `None` keeps it forever
    pub idle_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            tls_roots: TlsRoots::default(),
            scheme_policy: SchemePolicy::default(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            queue_depth: 64,
            idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}
