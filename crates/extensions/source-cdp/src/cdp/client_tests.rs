use std::time::Duration;

use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

use super::*;

#[tokio::test]
async fn test_connect_reports_unavailable_browser() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    match CdpClient::connect(&mock_server.uri()).await {
        Err(CdpError::ChromeNotAvailable(msg)) => assert!(msg.contains(&mock_server.uri())),
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("expected connect failure"),
    }
}

#[tokio::test]
async fn test_connect_with_retry_exhausts_attempts() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let result =
        CdpClient::connect_with_retry(&mock_server.uri(), 3, Duration::from_millis(1)).await;
    assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
}

#[tokio::test]
async fn test_connect_rejects_bad_version_payload() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Browser": "Chrome"})))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        CdpClient::connect(&format!("{}/", mock_server.uri())).await,
        Err(CdpError::ChromeNotAvailable(_))
    ));
}
