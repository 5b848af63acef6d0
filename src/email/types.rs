use serde::{Deserialize, Serialize};

/// Which email template to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Invite a parent to fill in the questionnaire.
    Invitation,
    /// Remind a parent about an unfinished questionnaire.
    Reminder,
    /// Thank a parent for completing the questionnaire.
    ThankYou,
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateKind::Invitation => write!(f, "invitation"),
            TemplateKind::Reminder => write!(f, "reminder"),
            TemplateKind::ThankYou => write!(f, "thank_you"),
        }
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invitation" => Ok(TemplateKind::Invitation),
            "reminder" => Ok(TemplateKind::Reminder),
            "thank_you" => Ok(TemplateKind::ThankYou),
            _ => Err(format!("Unknown template: {}", s)),
        }
    }
}

/// Per-recipient substitution values for template rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateData {
    /// Parent's name, used in the greeting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// Child's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_name: Option<String>,
    /// Teacher sending the email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    /// Link to start or resume the questionnaire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_url: Option<String>,
    /// Free-form note appended to the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

/// One addressee in a notification batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecipient {
    /// Recipient address.
    pub email: String,
    /// Substitution values for this recipient.
    #[serde(default)]
    pub data: TemplateData,
}

/// A request to send one template to a list of recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendBatch {
    /// Template to render.
    pub template: TemplateKind,
    /// Addressees with their substitution data.
    pub recipients: Vec<BatchRecipient>,
}

impl SendBatch {
    /// Create an empty batch for a template.
    pub fn new(template: TemplateKind) -> Self {
        Self {
            template,
            recipients: Vec::new(),
        }
    }

    /// Add a recipient.
    pub fn with_recipient(mut self, email: impl Into<String>, data: TemplateData) -> Self {
        self.recipients.push(BatchRecipient {
            email: email.into(),
            data,
        });
        self
    }
}

/// One failed delivery within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryFailure {
    /// Recipient address the failure applies to.
    pub email: String,
    /// Gateway error message.
    pub error: String,
}

/// Per-recipient outcome counts for a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendReport {
    /// Number of messages the gateway accepted.
    pub sent: u32,
    /// Number of messages that failed.
    pub failed: u32,
    /// Detail for each failure.
    pub failures: Vec<DeliveryFailure>,
}

/// A single rendered message handed to the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

impl OutboundEmail {
    /// Create a new outbound message.
    pub fn new(
        from_email: impl Into<String>,
        from_name: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            from_email: from_email.into(),
            from_name: from_name.into(),
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }
}

/// Gateway acknowledgement for an accepted message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    /// Provider-assigned message id, when one is returned.
    #[serde(rename = "messageId")]
    pub message_id: Option<String>,
}
