use std::time::Instant;

use tracing::{info, warn};

use super::client::EmailClient;
use super::templates;
use super::types::{DeliveryFailure, OutboundEmail, SendBatch, SendReport};
use crate::config::EmailConfig;
use crate::error::{ApiError, AppResult};
use crate::storage::{EmailDelivery, SqliteStorage, Storage};

/// Renders notification batches and dispatches them through the gateway.
///
/// Recipients are processed sequentially; a failed delivery is recorded
/// and counted but never aborts the rest of the batch.
pub struct Mailer {
    storage: SqliteStorage,
    client: EmailClient,
    sender_email: String,
    sender_name: String,
}

impl Mailer {
    /// Create a new mailer
    pub fn new(storage: SqliteStorage, client: EmailClient, config: &EmailConfig) -> Self {
        Self {
            storage,
            client,
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        }
    }

    /// Send a notification batch and report per-recipient outcomes
    pub async fn process(&self, batch: SendBatch) -> AppResult<SendReport> {
        if batch.recipients.is_empty() {
            return Err(ApiError::Validation {
                field: "recipients".to_string(),
                reason: "At least one recipient is required".to_string(),
            }
            .into());
        }

        for recipient in &batch.recipients {
            if !recipient.email.contains('@') {
                return Err(ApiError::Validation {
                    field: "recipients".to_string(),
                    reason: format!("Invalid email address: {}", recipient.email),
                }
                .into());
            }
        }

        let mut report = SendReport::default();

        for recipient in &batch.recipients {
            let rendered = templates::render(batch.template, &recipient.data);
            let email = OutboundEmail::new(
                &self.sender_email,
                &self.sender_name,
                &recipient.email,
                &rendered.subject,
                &rendered.html,
            );

            let delivery = EmailDelivery::new(
                &recipient.email,
                batch.template.to_string(),
                &rendered.subject,
            );

            let start = Instant::now();
            match self.client.send(&email).await {
                Ok(_) => {
                    let latency = start.elapsed().as_millis() as i64;
                    self.storage
                        .log_email_delivery(&delivery.success(latency))
                        .await?;
                    report.sent += 1;
                }
                Err(e) => {
                    let latency = start.elapsed().as_millis() as i64;
                    warn!(
                        recipient = %recipient.email,
                        error = %e,
                        "Delivery failed, continuing with remaining recipients"
                    );
                    self.storage
                        .log_email_delivery(&delivery.failure(e.to_string(), latency))
                        .await?;
                    report.failed += 1;
                    report.failures.push(DeliveryFailure {
                        email: recipient.email.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            template = %batch.template,
            sent = report.sent,
            failed = report.failed,
            "Notification batch completed"
        );

        Ok(report)
    }
}
