use crate::health::responses::HealthCheckResponse;
use crate::http::tests::test_server;

#[tokio::test]
async fn test_health_check() {
    let server = test_server();

    let response = server.get("/health/check").await;

    response.assert_status_ok();
    response.assert_json(&HealthCheckResponse {
        error: false,
        version: String::from(env!("CARGO_PKG_VERSION")),
    });
}

#[tokio::test]
async fn test_health_check_rejects_post() {
    let server = test_server();

    let response = server.post("/health/check").await;

    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}
