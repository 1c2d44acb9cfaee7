//! HTTPS connector construction.

use std::sync::Arc;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls::crypto::CryptoProvider;
use tracing::{debug, warn};

use crate::config::{SchemePolicy, TlsRoots};
use crate::error::HttpError;

/// The process default provider if one is installed, else aws-lc-rs (not installed globally).
fn crypto_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// Client config trusting the OS store. An empty or unreadable store is an
/// error now rather than a failed handshake later.
fn native_client_config() -> Result<rustls::ClientConfig, HttpError> {
    let loaded = rustls_native_certs::load_native_certs();
    for err in &loaded.errors {
        warn!(error = %err, "skipping unreadable native certificate");
    }

    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(loaded.certs);
    if ignored > 0 {
        warn!(added, ignored, "some native root certificates did not parse");
    }
    if added == 0 {
        return Err(HttpError::Tls("no usable native root certificates".into()));
    }
    debug!(added, "loaded native root certificates");

    Ok(rustls::ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| HttpError::Tls(Box::new(e)))?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

/// Connector speaking HTTP/1.1 and HTTP/2 (ALPN) over rustls.
pub(crate) fn https_connector(
    roots: TlsRoots,
    policy: SchemePolicy,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let builder = match roots {
        TlsRoots::WebPki => HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(crypto_provider())
            .map_err(|e| HttpError::Tls(Box::new(e)))?,
        TlsRoots::Native => HttpsConnectorBuilder::new().with_tls_config(native_client_config()?),
    };

    Ok(match policy {
        SchemePolicy::HttpsOnly => builder.https_only().enable_all_versions().build(),
        SchemePolicy::AllowHttp => builder.https_or_http().enable_all_versions().build(),
    })
}
