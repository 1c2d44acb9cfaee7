//! The contract every remote calculation implements, plus the input parsing
//! shared by the forms.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A remote function that takes a small JSON document and returns another.
///
/// Implementors are zero-sized markers; all state lives in
/// [`Interaction`](super::Interaction).
pub trait RemoteCalculation: Send + Sync + 'static {
    /// Short name used in logs.
    const NAME: &'static str;

    /// Fixed URL of the remote function.
    const ENDPOINT: &'static str;

    /// Raw text of every input, exactly as typed. `Default` gives the initial values.
    type Form: Clone + Default + fmt::Debug + Send + Sync + 'static;

    /// JSON body posted to the function.
    type Request: Serialize + fmt::Debug + Send + 'static;

    /// JSON body the function answers with on success.
    type Output: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;

    /// Parse the form into the request body. Never fails: text that does not
    /// parse is forwarded as `null` and left for the function to reject.
    fn request(form: &Self::Form) -> Self::Request;
}

/// Parse a decimal field. Unparsable text yields `NaN`, which serializes as `null`.
#[must_use]
pub fn parse_decimal(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse an integer field from its leading digits: optional sign, then
/// digits up to the first other character. `"12abc"` is 12, `"1e3"` is 1,
/// `"30.7"` is 30.
///
/// Text without leading digits, or beyond the `i64` range, yields `None`
/// (`null` on the wire).
#[must_use]
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let sign = text.len() - unsigned.len();
    text[..sign + digits].parse().ok()
}

/// Shortest text that reads back as `value`, switching to exponent notation
/// below `1e-6` and from `1e21` on (`1e-7`, `1.5e+21`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}
