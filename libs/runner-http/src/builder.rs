use std::time::Duration;

use crate::client::HttpClient;
use crate::config::{ClientConfig, SchemePolicy, TlsRoots};
use crate::error::HttpError;
use crate::stack;

/// Builder for an [`HttpClient`].
#[derive(Debug, Clone, Default)]
pub struct HttpClientBuilder {
    config: ClientConfig,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.max_body_size = bytes;
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRoots) -> Self {
        self.config.tls_roots = roots;
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.config.max_redirects = hops;
        self
    }

    #[must_use]
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.config.queue_depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Accept plain `http://` URLs.
    ///
    /// Only compiled into debug builds or with the `allow-insecure-http`
    /// feature, for talking to local mock servers.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        self.config.scheme_policy = SchemePolicy::AllowHttp;
        self
    }

    /// Build the client. Must run inside a tokio runtime: the request queue
    /// spawns its worker.
    ///
    /// # Errors
    /// `HttpError::Tls` when the root certificates cannot be loaded,
    /// `HttpError::InvalidHeader` for an unusable user agent.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        if self.config.scheme_policy == SchemePolicy::AllowHttp {
            tracing::warn!(
                target: "runner_http::security",
                "plain HTTP allowed; traffic will not be encrypted"
            );
        }

        Ok(HttpClient {
            stack: stack::build(&self.config)?,
            max_body_size: self.config.max_body_size,
            scheme_policy: self.config.scheme_policy,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};

    #[test]
    fn setters_update_config() {
        let builder = HttpClientBuilder::new()
            .user_agent("function-runner/1.0")
            .max_body_size(2048)
            .max_redirects(0)
            .tls_roots(TlsRoots::Native)
            .queue_depth(0)
            .idle_timeout(None);

        assert_eq!(builder.config.user_agent, "function-runner/1.0");
        assert_eq!(builder.config.max_body_size, 2048);
        assert_eq!(builder.config.max_redirects, 0);
        assert_eq!(builder.config.tls_roots, TlsRoots::Native);
        assert_eq!(builder.config.queue_depth, 1);
        assert!(builder.config.idle_timeout.is_none());
    }

    #[test]
    fn defaults_match_config_defaults() {
        let builder = HttpClientBuilder::new();
        assert_eq!(builder.config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(builder.config.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert_eq!(builder.config.scheme_policy, SchemePolicy::HttpsOnly);
    }

    #[test]
    fn insecure_http_switches_policy() {
        let builder = HttpClientBuilder::new().allow_insecure_http();
        assert_eq!(builder.config.scheme_policy, SchemePolicy::AllowHttp);
    }

    #[tokio::test]
    async fn builds_with_bundled_roots() {
        assert!(HttpClientBuilder::new().build().is_ok());
    }
}
