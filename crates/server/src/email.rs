//! Outbound quote email delivery.
//!
//! Renders HTML and plain-text bodies from templates and hands them to
//! an HTTP mail API. Delivery failures are the one class of error this
//! service surfaces to the user; pricing itself is never retried on
//! their account, because pricing is not the failing component.

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::{info, warn};

use ratecard_core::config::EmailConfig;
use ratecard_core::domain::quote::{QuoteContact, QuoteDelivery};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email delivery is not configured")]
    NotConfigured,
    #[error("template error: {0}")]
    Template(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("mail API rejected the message (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailReceipt {
    pub message_id: Option<String>,
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bcc: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct MailApiResponse {
    #[serde(default)]
    id: Option<String>,
}

pub struct QuoteMailer {
    client: Client,
    config: EmailConfig,
    templates: Tera,
}

impl QuoteMailer {
    pub fn new(config: EmailConfig) -> Self {
        let mut templates = Tera::default();
        templates
            .add_raw_template(
                "email/quote_email.html.tera",
                include_str!("../../../templates/email/quote_email.html.tera"),
            )
            .expect("embedded quote email html template must parse");
        templates
            .add_raw_template(
                "email/quote_email.txt.tera",
                include_str!("../../../templates/email/quote_email.txt.tera"),
            )
            .expect("embedded quote email text template must parse");

        Self { client: Client::new(), config, templates }
    }

    pub fn is_configured(&self) -> bool {
        self.config.enabled && self.config.api_url.is_some() && self.config.api_key.is_some()
    }

    fn render(&self, name: &str, context: &Context) -> Result<String, MailError> {
        self.templates.render(name, context).map_err(|e| MailError::Template(e.to_string()))
    }

    pub fn render_bodies(
        &self,
        contact: &QuoteContact,
        delivery: &QuoteDelivery,
    ) -> Result<(String, String), MailError> {
        let mut context = Context::new();
        context.insert("contact", contact);
        context.insert("delivery", delivery);
        context.insert(
            "generated_at",
            &chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
        );

        let html = self.render("email/quote_email.html.tera", &context)?;
        let text = self.render("email/quote_email.txt.tera", &context)?;
        Ok((html, text))
    }

    pub async fn send_quote(
        &self,
        contact: &QuoteContact,
        delivery: &QuoteDelivery,
    ) -> Result<MailReceipt, MailError> {
        let (api_url, api_key) = match (&self.config.api_url, &self.config.api_key) {
            (Some(api_url), Some(api_key)) if self.config.enabled => (api_url, api_key),
            _ => return Err(MailError::NotConfigured),
        };

        let (html, text) = self.render_bodies(contact, delivery)?;

        let message = OutboundMessage {
            from: &self.config.from_address,
            to: &contact.email,
            bcc: self.config.bcc.as_deref(),
            subject: &self.config.subject,
            html: &html,
            text: &text,
        };

        let response = self
            .client
            .post(api_url)
            .bearer_auth(api_key.expose_secret())
            .json(&message)
            .send()
            .await
            .map_err(|error| MailError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "mail API rejected quote email");
            return Err(MailError::Rejected { status: status.as_u16(), body });
        }

        let receipt = response
            .json::<MailApiResponse>()
            .await
            .map(|payload| MailReceipt { message_id: payload.id })
            .unwrap_or(MailReceipt { message_id: None });

        info!(to = %contact.email, "quote email delivered");
        Ok(receipt)
    }
}
