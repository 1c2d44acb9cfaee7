//! HTML handlers for the function runner page
//!
//! A visitor is identified by the session cookie. Visitors without a live
//! session see the initial page; their first submission opens one.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Form};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{Session, SumForm, TicketForm};
use crate::module::FunctionRunner;

use super::view;

/// Name of the cookie carrying the visitor's session id.
pub const SESSION_COOKIE: &str = "function_runner_session";

/// Handler for GET /
pub async fn page(
    Extension(runner): Extension<Arc<FunctionRunner>>,
    headers: HeaderMap,
) -> Html<String> {
    let session = runner.session(session_id(&headers));
    Html(view::render_session(session.as_deref()))
}

/// Handler for POST /ticket
///
/// Runs the ticket pricing call and answers with the re-rendered page. A
/// submission while the visitor's card is busy sends nothing.
#[instrument(skip_all)]
pub async fn submit_ticket(
    Extension(runner): Extension<Arc<FunctionRunner>>,
    headers: HeaderMap,
    Form(form): Form<TicketForm>,
) -> Response {
    let (opened, session) = visitor_session(&runner, &headers);
    let outcome = session.ticket().submit(form).await;
    debug!(?outcome, "ticket submission handled");
    page_response(&session, opened)
}

/// Handler for POST /sum
#[instrument(skip_all)]
pub async fn submit_sum(
    Extension(runner): Extension<Arc<FunctionRunner>>,
    headers: HeaderMap,
    Form(form): Form<SumForm>,
) -> Response {
    let (opened, session) = visitor_session(&runner, &headers);
    let outcome = session.sum().submit(form).await;
    debug!(?outcome, "sum submission handled");
    page_response(&session, opened)
}

/// Handler for GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// The visitor's live session, or a new one whose id still has to be sent.
fn visitor_session(runner: &FunctionRunner, headers: &HeaderMap) -> (Option<Uuid>, Arc<Session>) {
    match runner.session(session_id(headers)) {
        Some(session) => (None, session),
        None => {
            let (id, session) = runner.open_session();
            (Some(id), session)
        }
    }
}

fn page_response(session: &Session, opened: Option<Uuid>) -> Response {
    let page = Html(view::render_session(Some(session)));
    match opened {
        Some(id) => ([(SET_COOKIE, session_cookie(id))], page).into_response(),
        None => page.into_response(),
    }
}

fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Session id from the `Cookie` headers. A malformed id counts as none.
fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
