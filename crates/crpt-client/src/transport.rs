//! Transport to the registration endpoint.
//!
//! The client hands an already encoded body and the signature to a
//! [`Transport`] and receives the raw status and body back. Nothing here
//! interprets the response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::client::SubmissionResponse;
use crate::error::{BuildError, TransportError};
use crate::version::user_agent;

/// Name of the header carrying the document signature.
pub const SIGNATURE_HEADER: &str = "Signature";

/// Extension point for how a signed document reaches the endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_document(
        &self,
        body: Vec<u8>,
        signature: &str,
    ) -> Result<SubmissionResponse, TransportError>;
}

/// HTTPS transport posting JSON to a single fixed endpoint.
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, BuildError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&user_agent()) {
            headers.insert(USER_AGENT, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_document(
        &self,
        body: Vec<u8>,
        signature: &str,
    ) -> Result<SubmissionResponse, TransportError> {
        let signature = HeaderValue::from_str(signature)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(SubmissionResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(
            format!("{}/api/v3/lk/documents/create", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_json_with_signature() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v3/lk/documents/create"))
            .and(header("content-type", "application/json"))
            .and(header("signature", "sig-123"))
            .and(header("user-agent", user_agent().as_str()))
            .and(body_json(serde_json::json!({"doc_id": "d1"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"value\":\"ok\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let response = transport(&server)
            .post_document(br#"{"doc_id":"d1"}"#.to_vec(), "sig-123")
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "{\"value\":\"ok\"}");
    }

    #[tokio::test]
    async fn non_success_status_is_returned_as_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let response = transport(&server)
            .post_document(b"{}".to_vec(), "sig")
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.body, "unauthorized");
    }

    #[tokio::test]
    async fn invalid_signature_header_fails_before_sending() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = transport(&server)
            .post_document(b"{}".to_vec(), "bad\nsignature")
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::InvalidHeader(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        // Reserve a free port, then close it so the connection is refused.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let transport =
            HttpTransport::new(format!("http://{addr}/create"), Duration::from_secs(2)).unwrap();

        let err = transport
            .post_document(b"{}".to_vec(), "sig")
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Http(_)));
    }

    #[test]
    fn keeps_endpoint() {
        let transport =
            HttpTransport::new("https://example.test/create", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.endpoint(), "https://example.test/create");
    }
}
