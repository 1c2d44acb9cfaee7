#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for the page routes.
//!
//! These tests build the real axum `Router` over the real HTTP client, point
//! both cards at a mock function server and send requests with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use function_runner::FunctionRunner;
use httpmock::prelude::*;
use runner_http::HttpClient;
use serde_json::json;
use tower::ServiceExt;

fn build_router(server: &MockServer) -> Router {
    let client = HttpClient::builder().allow_insecure_http().build().unwrap();
    let runner = FunctionRunner::with_endpoints(
        Arc::new(function_runner::HttpFunctionTransport::new(client)),
        server.url("/ticket"),
        server.url("/sum"),
    );
    Arc::new(runner).router()
}

/// One browser: remembers the session cookie it is handed.
#[derive(Default)]
struct Visitor {
    cookie: Option<String>,
}

impl Visitor {
    async fn send(&mut self, router: &Router, method: Method, uri: &str, form: &str) -> (StatusCode, String) {
        let mut request = Request::builder().method(method).uri(uri);
        if !form.is_empty() {
            request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie.as_str());
        }
        let response = router
            .clone()
            .oneshot(request.body(Body::from(form.to_owned())).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}

async fn send(router: Router, method: Method, uri: &str, form: &str) -> (StatusCode, String) {
    Visitor::default().send(&router, method, uri, form).await
}

#[tokio::test]
async fn index_renders_both_cards_with_defaults() {
    let server = MockServer::start();
    let (status, page) = send(build_router(&server), Method::GET, "/", "").await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Function Runner"));
    assert!(page.contains("Dynamic Ticket Pricing"));
    assert!(page.contains("Sum Function"));
    assert!(page.contains("name=\"basePrice\" value=\"100\""));
    assert!(page.contains("name=\"demand\" value=\"1.5\""));
    assert!(page.contains("name=\"daysUntilEvent\" value=\"30\""));
    assert!(page.contains("name=\"num1\" value=\"10\""));
    assert!(page.contains("name=\"num2\" value=\"20\""));
}

#[tokio::test]
async fn health_is_ok() {
    let server = MockServer::start();
    let (status, body) = send(build_router(&server), Method::GET, "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn sum_submission_renders_result() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/sum")
            .json_body(json!({"num1": 3.0, "num2": 4.0}));
        then.status(200).json_body(json!({"sum": 7}));
    });

    let (status, page) = send(build_router(&server), Method::POST, "/sum", "num1=3&num2=4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(mock.calls(), 1);
    assert!(page.contains("<p class=\"result__sum\">7</p>"));
    assert!(page.contains("name=\"num1\" value=\"3\""));
}

#[tokio::test]
async fn ticket_submission_renders_breakdown() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST)
            .path("/ticket")
            .json_body(json!({"basePrice": 100.0, "demand": 1.5, "daysUntilEvent": 30}));
        then.status(200).json_body(json!({
            "basePrice": 100,
            "demand": 1.5,
            "daysUntilEvent": 30,
            "finalPrice": 150.5,
            "priceIncrease": 50.5
        }));
    });

    let (status, page) = send(
        build_router(&server),
        Method::POST,
        "/ticket",
        "basePrice=100&demand=1.5&daysUntilEvent=30",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    for expected in ["$100.00", ">1.5<", ">30<", "$50.50", "$150.50"] {
        assert!(page.contains(expected), "missing {expected}");
    }
}

#[tokio::test]
async fn server_error_message_is_rendered() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path("/sum");
        then.status(500).json_body(json!({"message": "bad input"}));
    });

    let (_, page) = send(build_router(&server), Method::POST, "/sum", "num1=3&num2=4").await;

    assert!(page.contains("<h3 class=\"error__title\">Error</h3>"));
    assert!(page.contains("bad input"));
    assert!(!page.contains("result__sum"));
}

#[tokio::test]
async fn unparsable_error_body_renders_status() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path("/sum");
        then.status(500).body("oops");
    });

    let (_, page) = send(build_router(&server), Method::POST, "/sum", "num1=3&num2=4").await;

    assert!(page.contains("500"));
    assert!(page.contains("An unknown error occurred"));
}

#[tokio::test]
async fn missing_field_is_sent_as_null_not_rejected() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/sum")
            .json_body(json!({"num1": 3.0, "num2": null}));
        then.status(400)
            .json_body(json!({"message": "num2 must be a number"}));
    });

    let (status, page) = send(build_router(&server), Method::POST, "/sum", "num1=3").await;

    assert_eq!(status, StatusCode::OK);
    mock.assert();
    assert!(page.contains("num2 must be a number"));
}

#[tokio::test]
async fn cards_are_independent() {
    let server = MockServer::start();
    let _sum = server.mock(|when, then| {
        when.method(POST).path("/sum");
        then.status(200).json_body(json!({"sum": 30}));
    });
    let _ticket = server.mock(|when, then| {
        when.method(POST).path("/ticket");
        then.status(500).json_body(json!({"message": "pricing offline"}));
    });

    let router = build_router(&server);
    let mut visitor = Visitor::default();
    visitor.send(&router, Method::POST, "/sum", "num1=10&num2=20").await;
    let (_, page) = visitor
        .send(&router, Method::POST, "/ticket", "basePrice=1&demand=1&daysUntilEvent=1")
        .await;

    assert!(page.contains("pricing offline"));
    assert!(page.contains("<p class=\"result__sum\">30</p>"));
}

#[tokio::test]
async fn returning_visitor_sees_own_result() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path("/sum");
        then.status(200).json_body(json!({"sum": 1234}));
    });

    let router = build_router(&server);
    let mut visitor = Visitor::default();
    visitor.send(&router, Method::POST, "/sum", "num1=1000&num2=234").await;
    assert!(visitor.cookie.is_some());

    let (_, page) = visitor.send(&router, Method::GET, "/", "").await;
    assert!(page.contains("<p class=\"result__sum\">1234</p>"));
    assert!(page.contains("name=\"num1\" value=\"1000\""));
}

#[tokio::test]
async fn other_visitors_do_not_see_each_others_state() {
    let server = MockServer::start();
    let _sum = server.mock(|when, then| {
        when.method(POST).path("/sum");
        then.status(200).json_body(json!({"sum": 1234}));
    });
    let _ticket = server.mock(|when, then| {
        when.method(POST).path("/ticket");
        then.status(500).json_body(json!({"message": "pricing offline"}));
    });

    let router = build_router(&server);
    let mut first = Visitor::default();
    first.send(&router, Method::POST, "/sum", "num1=1000&num2=234").await;

    // a fresh browser gets the initial page
    let (_, page) = Visitor::default().send(&router, Method::GET, "/", "").await;
    assert!(!page.contains("1234"));
    assert!(!page.contains("value=\"1000\""));
    assert!(page.contains("name=\"num1\" value=\"10\""));

    // a second visitor with their own session sees only their own outcome
    let mut second = Visitor::default();
    let (_, page) = second
        .send(&router, Method::POST, "/ticket", "basePrice=1&demand=1&daysUntilEvent=1")
        .await;
    assert_ne!(first.cookie, second.cookie);
    assert!(page.contains("pricing offline"));
    assert!(!page.contains("result__sum"));

    let (_, page) = first.send(&router, Method::GET, "/", "").await;
    assert!(page.contains("<p class=\"result__sum\">1234</p>"));
    assert!(!page.contains("pricing offline"));
}

#[tokio::test]
async fn stale_session_cookie_gets_a_fresh_session() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path("/sum");
        then.status(200).json_body(json!({"sum": 7}));
    });

    let router = build_router(&server);
    let stale = "function_runner_session=67e55044-10b1-426f-9247-bb680e5fe0c8".to_owned();
    let mut visitor = Visitor {
        cookie: Some(stale.clone()),
    };

    let (_, page) = visitor.send(&router, Method::GET, "/", "").await;
    assert!(page.contains("name=\"num1\" value=\"10\""));

    visitor.send(&router, Method::POST, "/sum", "num1=3&num2=4").await;
    assert_ne!(visitor.cookie.as_deref(), Some(stale.as_str()));
}
