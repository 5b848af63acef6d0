//! Email gateway for parent notifications.
//!
//! Teachers invite and remind parents through templated transactional
//! emails. The client speaks a bearer-token JSON API; the mailer renders
//! templates, sends one message per recipient, and records every attempt
//! in the delivery audit log.

mod client;
mod mailer;
pub mod templates;
mod types;

pub use client::EmailClient;
pub use mailer::Mailer;
pub use types::{
    BatchRecipient, DeliveryFailure, OutboundEmail, SendBatch, SendReport, SendResponse,
    TemplateData, TemplateKind,
};
