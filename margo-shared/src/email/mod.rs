/// Transactional email delivery
///
/// Email is an outbound side effect only: the planning core never sends mail,
/// and no API response depends on delivery succeeding.
///
/// # Senders
///
/// - [`sendgrid::SendGridClient`]: SendGrid v3 REST API over reqwest
/// - [`LoggingMailer`]: logs every call, used when no API key is configured
///
/// # Example
///
/// ```
/// use margo_shared::email::{EmailSender, LoggingMailer, TemplateEmail};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = LoggingMailer;
/// mailer.send_template(TemplateEmail {
///     to: "ada@example.com".to_string(),
///     template_id: "d-welcome".to_string(),
///     dynamic_data: json!({ "first_name": "Ada" }),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod onboarding;
pub mod sendgrid;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use sendgrid::SendGridClient;

/// Error type for email delivery
#[derive(Debug, Error)]
pub enum EmailError {
    /// The request never got a response
    #[error("email provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("email provider rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A templated transactional email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEmail {
    pub to: String,
    pub template_id: String,
    /// Values substituted into the template
    pub dynamic_data: serde_json::Value,
}

/// A contact to add to (or update in) a marketing list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingContact {
    pub email: String,
    pub first_name: Option<String>,
    pub list_id: String,
}

/// Email-delivery capability
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_template(&self, email: TemplateEmail) -> Result<(), EmailError>;

    /// Creates the contact or updates it in place
    async fn upsert_contact(&self, contact: MarketingContact) -> Result<(), EmailError>;
}

/// Sender that only logs what it would have sent
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailer;

#[async_trait]
impl EmailSender for LoggingMailer {
    async fn send_template(&self, email: TemplateEmail) -> Result<(), EmailError> {
        info!(
            to = %email.to,
            template_id = %email.template_id,
            "Email delivery disabled, not sending template email"
        );
        Ok(())
    }

    async fn upsert_contact(&self, contact: MarketingContact) -> Result<(), EmailError> {
        info!(
            email = %contact.email,
            list_id = %contact.list_id,
            "Email delivery disabled, not upserting contact"
        );
        Ok(())
    }
}
