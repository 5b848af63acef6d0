//! Centralized email template definitions.
//!
//! This module contains the subject and body text for every template
//! the gateway can send. Centralizing the copy makes it easier to
//! maintain and version; placeholders use `{{name}}` syntax and fall
//! back to neutral wording when a value is absent.

use super::types::{TemplateData, TemplateKind};

/// Subject line for the invitation template.
pub const INVITATION_SUBJECT: &str = "You're invited: a short learning-style questionnaire for {{child_name}}";

/// Body for the invitation template.
pub const INVITATION_BODY: &str = r#"<p>Hi {{parent_name}},</p>
<p>{{teacher_name}} has invited you to complete a short questionnaire about
{{child_name}}. Your answers build a learning-style profile that helps us
understand how {{child_name}} works, plays, and learns best.</p>
<p>It takes about ten minutes, and you can pause and pick it up again on any
device.</p>
<p><a href="{{assessment_url}}">Start the questionnaire</a></p>
{{custom_message}}
<p>Thank you!</p>"#;

/// Subject line for the reminder template.
pub const REMINDER_SUBJECT: &str = "A gentle reminder: {{child_name}}'s questionnaire is waiting";

/// Body for the reminder template.
pub const REMINDER_BODY: &str = r#"<p>Hi {{parent_name}},</p>
<p>Just a gentle reminder that the learning-style questionnaire for
{{child_name}} hasn't been finished yet. Your saved answers are still there,
so you can continue right where you left off.</p>
<p><a href="{{assessment_url}}">Continue the questionnaire</a></p>
{{custom_message}}
<p>Thank you!</p>"#;

/// Subject line for the thank-you template.
pub const THANK_YOU_SUBJECT: &str = "Thank you - {{child_name}}'s learning profile is ready";

/// Body for the thank-you template.
pub const THANK_YOU_BODY: &str = r#"<p>Hi {{parent_name}},</p>
<p>Thank you for completing the questionnaire. {{child_name}}'s learning
profile is ready to view and share.</p>
<p><a href="{{assessment_url}}">View the profile</a></p>
{{custom_message}}
<p>Warm regards,<br/>{{teacher_name}}</p>"#;

/// A rendered subject and body pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    /// Rendered subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html: String,
}

/// Render a template with per-recipient data.
pub fn render(kind: TemplateKind, data: &TemplateData) -> RenderedEmail {
    let (subject, body) = match kind {
        TemplateKind::Invitation => (INVITATION_SUBJECT, INVITATION_BODY),
        TemplateKind::Reminder => (REMINDER_SUBJECT, REMINDER_BODY),
        TemplateKind::ThankYou => (THANK_YOU_SUBJECT, THANK_YOU_BODY),
    };

    RenderedEmail {
        subject: fill(subject, data),
        html: fill(body, data),
    }
}

/// Substitute placeholders, defaulting absent values to neutral copy.
fn fill(template: &str, data: &TemplateData) -> String {
    let custom_message = data
        .custom_message
        .as_ref()
        .map(|m| format!("<p>{}</p>", m))
        .unwrap_or_default();

    template
        .replace(
            "{{parent_name}}",
            data.parent_name.as_deref().unwrap_or("there"),
        )
        .replace(
            "{{child_name}}",
            data.child_name.as_deref().unwrap_or("your child"),
        )
        .replace(
            "{{teacher_name}}",
            data.teacher_name.as_deref().unwrap_or("Your child's teacher"),
        )
        .replace(
            "{{assessment_url}}",
            data.assessment_url.as_deref().unwrap_or("#"),
        )
        .replace("{{custom_message}}", &custom_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> TemplateData {
        TemplateData {
            parent_name: Some("Jordan".to_string()),
            child_name: Some("Sam".to_string()),
            teacher_name: Some("Ms. Rivera".to_string()),
            assessment_url: Some("https://example.com/a/123".to_string()),
            custom_message: None,
        }
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let rendered = render(TemplateKind::Invitation, &sample_data());
        assert!(rendered.subject.contains("Sam"));
        assert!(rendered.html.contains("Jordan"));
        assert!(rendered.html.contains("Ms. Rivera"));
        assert!(rendered.html.contains("https://example.com/a/123"));
        assert!(!rendered.html.contains("{{"));
    }

    #[test]
    fn test_render_defaults_when_data_absent() {
        let rendered = render(TemplateKind::Reminder, &TemplateData::default());
        assert!(rendered.html.contains("Hi there,"));
        assert!(rendered.html.contains("your child"));
        assert!(!rendered.html.contains("{{"));
    }

    #[test]
    fn test_custom_message_is_wrapped() {
        let data = TemplateData {
            custom_message: Some("See you at pickup.".to_string()),
            ..sample_data()
        };
        let rendered = render(TemplateKind::ThankYou, &data);
        assert!(rendered.html.contains("<p>See you at pickup.</p>"));
    }

    #[test]
    fn test_each_template_renders_distinct_subject() {
        let data = sample_data();
        let subjects: std::collections::BTreeSet<String> = [
            TemplateKind::Invitation,
            TemplateKind::Reminder,
            TemplateKind::ThankYou,
        ]
        .iter()
        .map(|k| render(*k, &data).subject)
        .collect();
        assert_eq!(subjects.len(), 3);
    }
}
