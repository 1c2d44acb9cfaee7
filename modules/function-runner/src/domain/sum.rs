//! Sum function: adds two numbers remotely.

use serde::{Deserialize, Serialize};

use super::calculation::{RemoteCalculation, parse_decimal};

pub const SUM_FUNCTION_URL: &str =
    "https://faas-blr1-8177d592.doserverless.co/api/v1/web/fn-a256fcb2-9e54-4419-8533-b3d62dcce";

/// Raw text of the two operands. Missing form fields decode as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumForm {
    #[serde(default)]
    pub num1: String,
    #[serde(default)]
    pub num2: String,
}

impl Default for SumForm {
    fn default() -> Self {
        Self {
            num1: "10".to_owned(),
            num2: "20".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SumRequest {
    pub num1: f64,
    pub num2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SumResult {
    pub sum: f64,
}

/// Marker for the sum function.
#[derive(Debug, Clone, Copy)]
pub struct SumCalculation;

impl RemoteCalculation for SumCalculation {
    const NAME: &'static str = "sum";
    const ENDPOINT: &'static str = SUM_FUNCTION_URL;

    type Form = SumForm;
    type Request = SumRequest;
    type Output = SumResult;

    fn request(form: &SumForm) -> SumRequest {
        SumRequest {
            num1: parse_decimal(&form.num1),
            num2: parse_decimal(&form.num2),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_has_parsed_operands() {
        let form = SumForm {
            num1: "3".to_owned(),
            num2: "4.5".to_owned(),
        };
        let body = serde_json::to_value(SumCalculation::request(&form)).unwrap();
        assert_eq!(body, json!({"num1": 3.0, "num2": 4.5}));
    }

    #[test]
    fn non_numeric_operand_is_null() {
        let form = SumForm {
            num1: "three".to_owned(),
            num2: "4".to_owned(),
        };
        let body = serde_json::to_value(SumCalculation::request(&form)).unwrap();
        assert_eq!(body, json!({"num1": null, "num2": 4.0}));
    }

    #[test]
    fn form_defaults_and_missing_fields() {
        assert_eq!(SumForm::default().num1, "10");
        assert_eq!(SumForm::default().num2, "20");

        let form: SumForm = serde_json::from_value(json!({"num1": "5"})).unwrap();
        assert_eq!(form.num1, "5");
        assert_eq!(form.num2, "");
    }

    #[test]
    fn result_accepts_integer_json() {
        let result: SumResult = serde_json::from_str(r#"{"sum":7}"#).unwrap();
        assert!((result.sum - 7.0).abs() < f64::EPSILON);
    }
}
