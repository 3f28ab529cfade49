use crate::app_context::{self, AppContext};
use crate::cli::tests::fake_args;
use crate::http::middleware::REQUEST_ID_HEADER;
use crate::http::{cors, router};
use crate::resize::config::ResizeConfig;
use axum::http::header::{ACCESS_CONTROL_REQUEST_METHOD, ORIGIN};
use axum::http::HeaderValue;
use axum_test::TestServer;

pub fn test_server() -> TestServer {
    let args = fake_args();
    let app_context = app_context::init(&args);
    let router = router::new(&args, app_context);
    TestServer::new(router).expect("Failed to run test server.")
}

pub fn test_server_with(config: ResizeConfig) -> TestServer {
    let args = fake_args();
    let router = router::new(&args, AppContext::new(config));
    TestServer::new(router).expect("Failed to run test server.")
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = test_server();

    let first = server.get("/health/check").await;
    let second = server.get("/health/check").await;

    let first_id = first.header(REQUEST_ID_HEADER);
    let second_id = second.header(REQUEST_ID_HEADER);
    assert_eq!(first_id.len(), 36);
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let server = test_server();

    let response = server
        .method(axum::http::Method::OPTIONS, "/api/resize")
        .add_header(ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .add_header(
            ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let server = test_server();

    let response = server.get("/api/unknown").await;

    response.assert_status_not_found();
}

#[test]
fn test_origins_are_normalized() {
    let origin = cors::parse_origin("https://app.example.com/").expect("Failed to parse origin.");

    assert_eq!(origin, "https://app.example.com");
}

#[test]
fn test_invalid_origins_are_rejected() {
    for origin in ["localhost:3000", "not an origin", "ftp://example.com", ""] {
        let result = cors::layer(&[String::from(origin)]);
        assert!(result.is_err(), "{origin:?} should be rejected");
    }
}

#[test]
#[should_panic(expected = "Failed to configure CORS")]
fn test_router_refuses_invalid_origin() {
    let mut args = fake_args();
    args.allowed_origins = vec![String::from("localhost:3000")];

    router::new(&args, app_context::init(&args));
}
