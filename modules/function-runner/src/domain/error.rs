//! Errors of a remote function call and the text shown for them.

use http::StatusCode;
use runner_http::HttpError;
use serde_json::Value;

use super::calculation::format_number;

/// Substituted when an error reply body is not JSON.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Shown when the underlying error carries no message at all.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// The request never produced an HTTP reply.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<HttpError> for TransportError {
    fn from(err: HttpError) -> Self {
        Self::new(err.to_string())
    }
}

/// Why a call to a remote function did not produce a result.
#[derive(thiserror::Error, Debug)]
pub enum CallError {
    /// The function answered with a non-2xx status
    #[error("{message}")]
    HttpStatus { status: StatusCode, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx reply whose body is not the expected JSON
    #[error("{0}")]
    Decode(#[source] serde_json::Error),

    #[error("{0}")]
    Encode(#[source] serde_json::Error),
}

impl CallError {
    /// Classify a non-2xx reply.
    ///
    /// The message comes from a non-empty `message` string, non-zero number or
    /// `true` in a JSON body. A body that is not JSON gives the generic
    /// message plus the status; JSON without a usable `message` gives the
    /// status alone.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let code = status.as_u16();
        let message = match serde_json::from_slice::<Value>(body) {
            Err(_) => format!("{UNKNOWN_ERROR_MESSAGE} (HTTP error! status: {code})"),
            Ok(value) => value
                .get("message")
                .and_then(message_text)
                .unwrap_or_else(|| format!("HTTP error! status: {code}")),
        };
        Self::HttpStatus { status, message }
    }

    /// Text for the error panel.
    #[must_use]
    pub fn user_message(&self) -> String {
        let detail = self.to_string();
        if detail.trim().is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_owned()
        } else {
            format!("Failed to fetch: {detail}. Please check the function URL and your network.")
        }
    }
}

/// Text of a scalar `message`; empty, zero, `false`, `null` and containers have none.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::Number(number) => number
            .as_f64()
            .filter(|n| *n != 0.0)
            .map(format_number),
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}
