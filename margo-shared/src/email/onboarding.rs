/// Welcome flow for new users
///
/// Sends the welcome template and adds the user to the marketing list. Both
/// calls run concurrently; a failure in either is logged and reported in the
/// [`WelcomeOutcome`] but never returned as an error.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use super::{EmailSender, MarketingContact, TemplateEmail};

/// Provider identifiers for the welcome flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeSettings {
    pub template_id: String,
    pub list_id: String,
}

/// Which half of the welcome flow succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeOutcome {
    pub email_sent: bool,
    pub contact_added: bool,
}

/// Sends the welcome email and upserts the marketing contact
pub async fn send_welcome(
    mailer: &dyn EmailSender,
    settings: &WelcomeSettings,
    email: &str,
    first_name: Option<&str>,
) -> WelcomeOutcome {
    let first_name = first_name.map(str::trim).filter(|n| !n.is_empty());

    let send = mailer.send_template(TemplateEmail {
        to: email.to_string(),
        template_id: settings.template_id.clone(),
        dynamic_data: json!({ "first_name": first_name.unwrap_or("there") }),
    });
    let upsert = mailer.upsert_contact(MarketingContact {
        email: email.to_string(),
        first_name: first_name.map(str::to_string),
        list_id: settings.list_id.clone(),
    });

    let (sent, added) = futures::join!(send, upsert);

    if let Err(e) = &sent {
        error!(email = %email, error = %e, "Failed to send welcome email");
    }
    if let Err(e) = &added {
        error!(email = %email, error = %e, "Failed to add contact to marketing list");
    }

    let outcome = WelcomeOutcome {
        email_sent: sent.is_ok(),
        contact_added: added.is_ok(),
    };
    info!(
        email = %email,
        email_sent = outcome.email_sent,
        contact_added = outcome.contact_added,
        "Welcome flow finished"
    );

    outcome
}
