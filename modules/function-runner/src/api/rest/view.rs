//! Server-side HTML for the page and its two calculator cards.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::{
    Phase, RemoteCalculation, Session, Snapshot, SumCalculation, SumForm, SumResult,
    TicketCalculation, TicketForm, TicketResult, format_number,
};

/// Seconds between reloads while a card is busy.
pub const BUSY_REFRESH_SECS: u32 = 2;

/// One labeled numeric input.
#[derive(Debug, Clone)]
pub struct InputField<'a> {
    pub id: &'static str,
    pub label: &'static str,
    pub value: &'a str,
    pub min: Option<&'static str>,
    pub step: Option<&'static str>,
    pub placeholder: &'static str,
}

/// Static copy and field layout of a calculator card.
pub trait CardView: RemoteCalculation {
    const TITLE: &'static str;
    const DESCRIPTION: &'static str;
    /// Form action the card posts to.
    const ACTION: &'static str;
    const BUTTON_LABEL: &'static str;

    fn inputs(form: &Self::Form) -> Vec<InputField<'_>>;

    /// Inner HTML of the result panel.
    fn result_panel(output: &Self::Output) -> String;
}

impl CardView for TicketCalculation {
    const TITLE: &'static str = "Dynamic Ticket Pricing";
    const DESCRIPTION: &'static str = "Calculates ticket price based on demand and time.";
    const ACTION: &'static str = "/ticket";
    const BUTTON_LABEL: &'static str = "Calculate Ticket Price";

    fn inputs(form: &TicketForm) -> Vec<InputField<'_>> {
        vec![
            InputField {
                id: "basePrice",
                label: "Base Price ($)",
                value: &form.base_price,
                min: Some("0"),
                step: Some("0.01"),
                placeholder: "e.g., 100",
            },
            InputField {
                id: "demand",
                label: "Demand (Multiplier)",
                value: &form.demand,
                min: Some("0"),
                step: Some("0.1"),
                placeholder: "e.g., 1.5",
            },
            InputField {
                id: "daysUntilEvent",
                label: "Days Until Event",
                value: &form.days_until_event,
                min: Some("0"),
                step: Some("1"),
                placeholder: "e.g., 30",
            },
        ]
    }

    fn result_panel(result: &TicketResult) -> String {
        let row = |label: &str, value: String| {
            format!(
                "<p>{label}: <span class=\"result__value\">{}</span></p>",
                encode_text(&value)
            )
        };

        let mut html = String::from("<h3>Calculation Result:</h3><div class=\"result__rows\">");
        html.push_str(&row("Base Price", format_currency(result.base_price)));
        html.push_str(&row("Demand Multiplier", format_number(result.demand)));
        html.push_str(&row("Days Until Event", format_number(result.days_until_event)));
        html.push_str(&row("Price Increase", format_currency(result.price_increase)));
        html.push_str("<hr class=\"separator\">");
        let _ = write!(
            html,
            "<p class=\"result__total\">Final Price: <span class=\"result__value\">{}</span></p>",
            encode_text(&format_currency(result.final_price))
        );
        html.push_str("</div>");
        html
    }
}

impl CardView for SumCalculation {
    const TITLE: &'static str = "Sum Function";
    const DESCRIPTION: &'static str = "Calculates the sum of two numbers.";
    const ACTION: &'static str = "/sum";
    const BUTTON_LABEL: &'static str = "Calculate Sum";

    fn inputs(form: &SumForm) -> Vec<InputField<'_>> {
        vec![
            InputField {
                id: "num1",
                label: "Number 1",
                value: &form.num1,
                min: None,
                step: None,
                placeholder: "e.g., 10",
            },
            InputField {
                id: "num2",
                label: "Number 2",
                value: &form.num2,
                min: None,
                step: None,
                placeholder: "e.g., 20",
            },
        ]
    }

    fn result_panel(result: &SumResult) -> String {
        format!(
            "<p class=\"result__label\">Sum</p><p class=\"result__sum\">{}</p>",
            encode_text(&format_number(result.sum))
        )
    }
}

/// `$` followed by the amount rounded to two decimals.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Render one card from a snapshot of its component.
///
/// While the component is loading the inputs and the button are disabled and
/// no panel is shown; otherwise at most one of the error and result panels is.
#[must_use]
pub fn render_card<C: CardView>(snapshot: &Snapshot<C::Form, C::Output>) -> String {
    let busy = snapshot.phase.is_loading();
    let disabled = if busy { " disabled" } else { "" };

    let mut html = String::new();
    let _ = write!(
        html,
        "<section class=\"card\" id=\"{}\">\
            <h2 class=\"card__title\">{}</h2>\
            <p class=\"card__description\">{}</p>\
            <form method=\"post\" action=\"{}\">",
        C::NAME,
        encode_text(C::TITLE),
        encode_text(C::DESCRIPTION),
        encode_double_quoted_attribute(C::ACTION),
    );

    for field in C::inputs(&snapshot.form) {
        render_input(&mut html, &field, disabled);
    }

    if busy {
        let _ = write!(
            html,
            "<button type=\"submit\" disabled aria-busy=\"true\">\
                <span class=\"spinner\" aria-hidden=\"true\"></span>{}</button>",
            encode_text(C::BUTTON_LABEL)
        );
    } else {
        let _ = write!(
            html,
            "<button type=\"submit\">{}</button>",
            encode_text(C::BUTTON_LABEL)
        );
    }
    html.push_str("</form>");

    match &snapshot.phase {
        Phase::Failure(message) => html.push_str(&render_error(message)),
        Phase::Success(output) => {
            let _ = write!(
                html,
                "<div class=\"result\">{}</div>",
                C::result_panel(output)
            );
        }
        Phase::Idle | Phase::Loading => {}
    }

    html.push_str("</section>");
    html
}

fn render_input(html: &mut String, field: &InputField<'_>, disabled: &str) {
    let _ = write!(
        html,
        "<div class=\"field\"><label for=\"{id}\">{label}</label>\
            <input type=\"number\" id=\"{id}\" name=\"{id}\" value=\"{value}\"",
        id = field.id,
        label = encode_text(field.label),
        value = encode_double_quoted_attribute(field.value),
    );
    if let Some(min) = field.min {
        let _ = write!(html, " min=\"{min}\"");
    }
    if let Some(step) = field.step {
        let _ = write!(html, " step=\"{step}\"");
    }
    let _ = write!(
        html,
        " placeholder=\"{}\" required{disabled}></div>",
        encode_double_quoted_attribute(field.placeholder)
    );
}

fn render_error(message: &str) -> String {
    format!(
        "<div class=\"error\" role=\"alert\">\
            <h3 class=\"error__title\">Error</h3>\
            <p class=\"error__message\">{}</p>\
        </div>",
        encode_text(message)
    )
}

/// Full page: ticket card first, then the sum card.
///
/// A busy card makes the page reload itself until the call settles.
#[must_use]
pub fn render_page(
    ticket: &Snapshot<TicketForm, TicketResult>,
    sum: &Snapshot<SumForm, SumResult>,
) -> String {
    let refresh = if ticket.phase.is_loading() || sum.phase.is_loading() {
        format!("<meta http-equiv=\"refresh\" content=\"{BUSY_REFRESH_SECS}\">")
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\
        <html lang=\"en\">\
        <head>\
            <meta charset=\"utf-8\">\
            <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
            {refresh}\
            <title>Function Runner</title>\
        </head>\
        <body>\
            <main>\
                <header>\
                    <h1>Function Runner</h1>\
                    <p>A tool for a university lab on serverless functions.</p>\
                </header>\
                {ticket}\
                {sum}\
                <footer>\
                    <p>Built for the &quot;Deploying Serverless Functions and Full-Stack Application&quot; lab.</p>\
                </footer>\
            </main>\
        </body>\
        </html>",
        ticket = render_card::<TicketCalculation>(ticket),
        sum = render_card::<SumCalculation>(sum),
    )
}

/// The page as one visitor sees it; no session means the initial page.
#[must_use]
pub fn render_session(session: Option<&Session>) -> String {
    match session {
        Some(session) => render_page(&session.ticket().snapshot(), &session.sum().snapshot()),
        None => render_page(&Snapshot::default(), &Snapshot::default()),
    }
}
