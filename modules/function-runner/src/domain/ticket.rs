//! Dynamic ticket pricing: final price from a base price, a demand multiplier
//! and the number of days until the event.

use serde::{Deserialize, Serialize};

use super::calculation::{RemoteCalculation, parse_decimal, parse_integer};

pub const TICKET_FUNCTION_URL: &str = "https://faas-blr1-8177d592.doserverless.co/api/v1/web/fn-747ca09c-87f4-4a23-b163-cf1a143ca682/default/dynamic-ticket-pricing";

/// Raw text of the pricing inputs. Field names match the HTML form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketForm {
    #[serde(default)]
    pub base_price: String,
    #[serde(default)]
    pub demand: String,
    #[serde(default)]
    pub days_until_event: String,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self {
            base_price: "100".to_owned(),
            demand: "1.5".to_owned(),
            days_until_event: "30".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub base_price: f64,
    pub demand: f64,
    /// `None` when the text is not an integer; sent as `null`
    pub days_until_event: Option<i64>,
}

/// Pricing reply. The inputs are echoed back so the breakdown can be shown as
/// the function saw it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResult {
    pub base_price: f64,
    pub demand: f64,
    pub days_until_event: f64,
    pub final_price: f64,
    pub price_increase: f64,
}

/// Marker for the ticket pricing function.
#[derive(Debug, Clone, Copy)]
pub struct TicketCalculation;

impl RemoteCalculation for TicketCalculation {
    const NAME: &'static str = "ticket";
    const ENDPOINT: &'static str = TICKET_FUNCTION_URL;

    type Form = TicketForm;
    type Request = TicketRequest;
    type Output = TicketResult;

    fn request(form: &TicketForm) -> TicketRequest {
        TicketRequest {
            base_price: parse_decimal(&form.base_price),
            demand: parse_decimal(&form.demand),
            days_until_event: parse_integer(&form.days_until_event),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_uses_camel_case() {
        let body = serde_json::to_value(TicketCalculation::request(&TicketForm::default())).unwrap();
        assert_eq!(
            body,
            json!({"basePrice": 100.0, "demand": 1.5, "daysUntilEvent": 30})
        );
    }

    #[test]
    fn fractional_days_are_truncated() {
        let form = TicketForm {
            days_until_event: "12.9".to_owned(),
            ..TicketForm::default()
        };
        assert_eq!(TicketCalculation::request(&form).days_until_event, Some(12));
    }

    #[test]
    fn garbage_inputs_become_null() {
        let form = TicketForm {
            base_price: "cheap".to_owned(),
            demand: String::new(),
            days_until_event: "tomorrow".to_owned(),
        };
        let body = serde_json::to_value(TicketCalculation::request(&form)).unwrap();
        assert_eq!(
            body,
            json!({"basePrice": null, "demand": null, "daysUntilEvent": null})
        );
    }

    #[test]
    fn form_decodes_html_field_names() {
        let form: TicketForm = serde_json::from_value(json!({
            "basePrice": "80",
            "demand": "2",
            "daysUntilEvent": "3"
        }))
        .unwrap();
        assert_eq!(form.base_price, "80");
        assert_eq!(form.days_until_event, "3");
    }

    #[test]
    fn result_decodes_reply() {
        let result: TicketResult = serde_json::from_value(json!({
            "basePrice": 100,
            "demand": 1.5,
            "daysUntilEvent": 30,
            "finalPrice": 150.5,
            "priceIncrease": 50.5
        }))
        .unwrap();
        assert!((result.final_price - 150.5).abs() < f64::EPSILON);
        assert!((result.days_until_event - 30.0).abs() < f64::EPSILON);
    }
}
