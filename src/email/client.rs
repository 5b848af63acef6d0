use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{OutboundEmail, SendResponse};
use crate::config::{EmailConfig, RequestConfig};
use crate::error::{EmailError, EmailResult};

/// Client for the transactional email gateway API
#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    base_url: String,
    api_key: String,
    request_config: RequestConfig,
}

impl EmailClient {
    /// Create a new email gateway client
    pub fn new(config: &EmailConfig, request_config: RequestConfig) -> EmailResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(EmailError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_config,
        })
    }

    /// Send one message, retrying transient failures with backoff
    pub async fn send(&self, email: &OutboundEmail) -> EmailResult<SendResponse> {
        let url = format!("{}/v1/send", self.base_url);

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.request_config.max_retries {
            if retries > 0 {
                let delay = Duration::from_millis(
                    self.request_config.retry_delay_ms * (2_u64.pow(retries - 1)),
                );
                warn!(
                    recipient = %email.to,
                    retry = retries,
                    delay_ms = delay.as_millis(),
                    "Retrying email delivery"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();

            match self.execute_request(&url, email).await {
                Ok(response) => {
                    let latency = start.elapsed();
                    info!(
                        recipient = %email.to,
                        latency_ms = latency.as_millis(),
                        "Email delivery succeeded"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    let latency = start.elapsed();
                    error!(
                        recipient = %email.to,
                        error = %e,
                        latency_ms = latency.as_millis(),
                        retry = retries,
                        "Email delivery failed"
                    );
                    last_error = Some(e);
                    retries += 1;
                }
            }
        }

        Err(EmailError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            retries,
        })
    }

    /// Execute a single request (internal)
    async fn execute_request(
        &self,
        url: &str,
        email: &OutboundEmail,
    ) -> EmailResult<SendResponse> {
        debug!(recipient = %email.to, subject = %email.subject, "Calling email gateway");

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(email)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmailError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    EmailError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let send_response: SendResponse =
            response
                .json()
                .await
                .map_err(|e| EmailError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        Ok(send_response)
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = EmailConfig {
            api_key: "test_key".to_string(),
            base_url: "https://api.mailgate.io".to_string(),
            sender_email: "no-reply@example.com".to_string(),
            sender_name: "Test".to_string(),
        };

        let request_config = RequestConfig::default();

        let client = EmailClient::new(&config, request_config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = EmailConfig {
            api_key: "test_key".to_string(),
            base_url: "https://api.mailgate.io/".to_string(),
            sender_email: "no-reply@example.com".to_string(),
            sender_name: "Test".to_string(),
        };

        let client = EmailClient::new(&config, RequestConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://api.mailgate.io");
    }
}
