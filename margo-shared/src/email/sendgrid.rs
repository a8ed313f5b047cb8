/// SendGrid v3 client
///
/// Two endpoints are used:
///
/// - `POST /v3/mail/send` with a dynamic template
/// - `PUT /v3/marketing/contacts` to upsert a contact into a list
///
/// Both answer `202 Accepted` on success. Any non-2xx status is returned as
/// [`EmailError::Rejected`] with the response body.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{EmailError, EmailSender, MarketingContact, TemplateEmail};

const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

/// SendGrid API client
#[derive(Debug, Clone)]
pub struct SendGridClient {
    http: Client,
    api_key: String,
    from_email: String,
    base_url: String,
}

impl SendGridClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// Creates a client sending from `from_email`
    pub fn new(api_key: impl Into<String>, from_email: impl Into<String>) -> Result<Self, EmailError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("margo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            from_email: from_email.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the client at another host, e.g. a local mock server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_email(&self) -> &str {
        &self.from_email
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<(), EmailError> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "SendGrid rejected request");

        Err(EmailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
    dynamic_template_data: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    template_id: &'a str,
}

impl<'a> MailSendRequest<'a> {
    pub(crate) fn new(email: &'a TemplateEmail, from: &'a str) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address { email: &email.to }],
                dynamic_template_data: &email.dynamic_data,
            }],
            from: Address { email: from },
            template_id: &email.template_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct ContactRecord<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpsertContactsRequest<'a> {
    list_ids: Vec<&'a str>,
    contacts: Vec<ContactRecord<'a>>,
}

impl<'a> UpsertContactsRequest<'a> {
    pub(crate) fn new(contact: &'a MarketingContact) -> Self {
        Self {
            list_ids: vec![&contact.list_id],
            contacts: vec![ContactRecord {
                email: &contact.email,
                first_name: contact.first_name.as_deref(),
            }],
        }
    }
}

#[async_trait]
impl EmailSender for SendGridClient {
    async fn send_template(&self, email: TemplateEmail) -> Result<(), EmailError> {
        debug!(to = %email.to, template_id = %email.template_id, "Sending template email");

        let body = MailSendRequest::new(&email, &self.from_email);
        let request = self
            .http
            .post(format!("{}/v3/mail/send", self.base_url))
            .json(&body);

        self.execute(request).await
    }

    async fn upsert_contact(&self, contact: MarketingContact) -> Result<(), EmailError> {
        debug!(email = %contact.email, list_id = %contact.list_id, "Upserting marketing contact");

        let body = UpsertContactsRequest::new(&contact);
        let request = self
            .http
            .put(format!("{}/v3/marketing/contacts", self.base_url))
            .json(&body);

        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mail_send_payload_shape() {
        let email = TemplateEmail {
            to: "ada@example.com".to_string(),
            template_id: "d-123".to_string(),
            dynamic_data: json!({ "first_name": "Ada" }),
        };

        let payload = serde_json::to_value(MailSendRequest::new(&email, "hello@margo.app")).unwrap();
        assert_eq!(
            payload,
            json!({
                "personalizations": [{
                    "to": [{ "email": "ada@example.com" }],
                    "dynamic_template_data": { "first_name": "Ada" }
                }],
                "from": { "email": "hello@margo.app" },
                "template_id": "d-123"
            })
        );
    }

    #[test]
    fn test_contact_payload_omits_missing_first_name() {
        let contact = MarketingContact {
            email: "ada@example.com".to_string(),
            first_name: None,
            list_id: "list-1".to_string(),
        };

        let payload = serde_json::to_value(UpsertContactsRequest::new(&contact)).unwrap();
        assert_eq!(
            payload,
            json!({
                "list_ids": ["list-1"],
                "contacts": [{ "email": "ada@example.com" }]
            })
        );
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let client = SendGridClient::new("key", "hello@margo.app")
            .unwrap()
            .with_base_url("http://localhost:8025/");
        assert_eq!(client.base_url, "http://localhost:8025");
        assert_eq!(client.from_email(), "hello@margo.app");
    }
}
