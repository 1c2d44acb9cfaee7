//! Layered application configuration.
//!
//! Defaults -> YAML file (if given) -> environment (`FUNCTION_RUNNER__*`) -> CLI overrides.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use function_runner::DEFAULT_MAX_SESSIONS;
use figment::providers::{Env, Format, Serialized, Yaml};
use runner_http::{DEFAULT_MAX_BODY_SIZE, HttpClient, HttpError, TlsRoots};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "FUNCTION_RUNNER__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http_client: HttpClientSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Visitor sessions kept before the least recently used is dropped
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8087)),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// One JSON object per line instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

/// Settings of the client that calls the remote functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientSettings {
    pub user_agent: String,
    pub max_body_size: usize,
    pub tls_roots: TlsRoots,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("function-runner/", env!("CARGO_PKG_VERSION")).to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            tls_roots: TlsRoots::default(),
        }
    }
}

impl HttpClientSettings {
    /// # Errors
    /// Returns `HttpError::Tls` when the root certificates cannot be loaded.
    pub fn build_client(&self) -> Result<HttpClient, HttpError> {
        HttpClient::builder()
            .user_agent(self.user_agent.clone())
            .max_body_size(self.max_body_size)
            .tls_roots(self.tls_roots)
            .build()
    }
}

impl AppConfig {
    /// Load the layered configuration.
    ///
    /// # Errors
    /// Fails when `path` is given but is not a file, or when a layer cannot be
    /// parsed into the config shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)?
            .extract()
            .context("failed to parse configuration")
    }

    fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn apply_cli_overrides(&mut self, bind: Option<SocketAddr>) {
        if let Some(bind) = bind {
            self.server.bind_addr = bind;
        }
    }

    /// # Errors
    /// Returns an error if the config cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize configuration")
    }
}
