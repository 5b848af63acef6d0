//! Integration tests for the email gateway
//!
//! Tests HTTP client behavior and batch dispatch using wiremock for
//! request/response mocking.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sixc_assessment::config::{EmailConfig, RequestConfig};
use sixc_assessment::email::{
    EmailClient, Mailer, OutboundEmail, SendBatch, TemplateData, TemplateKind,
};
use sixc_assessment::storage::SqliteStorage;

/// Create a test client pointing to the mock server
fn create_test_client(base_url: &str, max_retries: u32) -> EmailClient {
    let config = test_email_config(base_url);

    let request_config = RequestConfig {
        timeout_ms: 5000,
        max_retries,
        retry_delay_ms: 10,
    };

    EmailClient::new(&config, request_config).expect("Failed to create client")
}

fn test_email_config(base_url: &str) -> EmailConfig {
    EmailConfig {
        api_key: "test-api-key".to_string(),
        base_url: base_url.to_string(),
        sender_email: "no-reply@example.com".to_string(),
        sender_name: "6C Assessment".to_string(),
    }
}

fn sample_email(to: &str) -> OutboundEmail {
    OutboundEmail::new(
        "no-reply@example.com",
        "6C Assessment",
        to,
        "Test subject",
        "<p>Hello</p>",
    )
}

#[cfg(test)]
mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_send() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(header("Content-Type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "messageId": "msg-123" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 0);
        let result = client.send(&sample_email("parent@example.com")).await;

        assert!(result.is_ok(), "Send should succeed: {:?}", result.err());
        assert_eq!(result.unwrap().message_id, Some("msg-123".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_then_success_retries() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "messageId": "msg-retry" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 2);
        let result = client.send(&sample_email("parent@example.com")).await;

        assert!(result.is_ok(), "Retry should recover: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_exhausted_retries_report_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 1);
        let result = client.send(&sample_email("parent@example.com")).await;

        assert!(result.is_err());
        let message = result.err().unwrap().to_string();
        assert!(
            message.contains("unavailable"),
            "unexpected error: {message}"
        );
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 0);
        let result = client.send(&sample_email("parent@example.com")).await;

        assert!(result.is_err());
    }
}

#[cfg(test)]
mod mailer_tests {
    use super::*;

    async fn create_test_mailer(mock_server: &MockServer) -> (Mailer, SqliteStorage) {
        let storage = SqliteStorage::new_in_memory()
            .await
            .expect("Failed to create in-memory storage");
        let client = create_test_client(&mock_server.uri(), 0);
        let config = test_email_config(&mock_server.uri());
        (Mailer::new(storage.clone(), client, &config), storage)
    }

    #[tokio::test]
    async fn test_batch_reports_per_recipient_counts() {
        let mock_server = MockServer::start().await;

        // One address is rejected by the gateway, the rest go through.
        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .and(body_partial_json(json!({ "to": "bounce@example.com" })))
            .respond_with(ResponseTemplate::new(400).set_body_string("hard bounce"))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "messageId": "msg-1" })),
            )
            .mount(&mock_server)
            .await;

        let (mailer, storage) = create_test_mailer(&mock_server).await;

        let batch = SendBatch::new(TemplateKind::Invitation)
            .with_recipient(
                "a@example.com",
                TemplateData {
                    parent_name: Some("Alex".to_string()),
                    ..TemplateData::default()
                },
            )
            .with_recipient("bounce@example.com", TemplateData::default())
            .with_recipient("b@example.com", TemplateData::default());

        let report = mailer.process(batch).await.expect("Batch should complete");

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].email, "bounce@example.com");

        // Every attempt lands in the audit log.
        let logged: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM email_deliveries")
            .fetch_one(storage.pool())
            .await
            .unwrap();
        assert_eq!(logged, 3);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_validation_error() {
        let mock_server = MockServer::start().await;
        let (mailer, _storage) = create_test_mailer(&mock_server).await;

        let result = mailer.process(SendBatch::new(TemplateKind::Reminder)).await;

        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("recipient"));
    }

    #[tokio::test]
    async fn test_invalid_address_is_a_validation_error() {
        let mock_server = MockServer::start().await;
        let (mailer, _storage) = create_test_mailer(&mock_server).await;

        let batch = SendBatch::new(TemplateKind::ThankYou)
            .with_recipient("not-an-address", TemplateData::default());
        let result = mailer.process(batch).await;

        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("Invalid email"));
    }
}
