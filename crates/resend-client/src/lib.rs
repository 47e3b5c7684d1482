//! Resend email API client.
//!
//! Covers the single endpoint this workspace needs: sending one
//! transactional email via `POST /emails` with bearer authentication.

mod client;
mod error;
mod types;

pub use client::ResendClient;
pub use error::ResendError;
pub use types::{SendEmailRequest, SendEmailResponse};

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> SendEmailRequest {
        SendEmailRequest {
            from: "Waitlist <onboarding@resend.dev>".into(),
            to: vec!["ada@example.com".into()],
            subject: "Welcome".into(),
            html: "<p>Hi</p>".into(),
        }
    }

    #[tokio::test]
    async fn test_send_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("Authorization", "Bearer test_key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "msg_123" })),
            )
            .mount(&mock_server)
            .await;

        let client = ResendClient::with_base_url("test_key", mock_server.uri()).unwrap();
        let sent = client.send(&request()).await.unwrap();
        assert_eq!(sent.id, "msg_123");
    }

    #[tokio::test]
    async fn test_send_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "message": "invalid api key" })),
            )
            .mount(&mock_server)
            .await;

        let client = ResendClient::with_base_url("bad_key", mock_server.uri()).unwrap();
        let err = client.send(&request()).await.unwrap_err();

        match err {
            ResendError::Api { status, .. } => assert_eq!(status, 401),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
