// SendGrid v3 mail implementation.
//
// One POST to /v3/mail/send per recipient, bearer-authenticated, HTML body.
// SendGrid answers 202 Accepted on success; any 2xx is treated as delivered.
//
// API docs: https://www.twilio.com/docs/sendgrid/api-reference/mail-send/mail-send

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::traits::{MailSender, OutgoingMessage};
use crate::config::Config;

/// Default SendGrid API endpoint.
pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com";

/// SendGrid-backed mail sender.
pub struct SendGridSender {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SendGridSender {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_sendgrid()?;
        Self::new(
            config.sendgrid_api_key.clone(),
            &config.sendgrid_api_url,
            config.http_timeout,
        )
    }
}

#[async_trait]
impl MailSender for SendGridSender {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let url = format!("{}/v3/mail/send", self.base_url);
        let request = MailSendRequest::from(message);

        debug!(to = %message.to, "SendGrid mail/send request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call SendGrid API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("SendGrid returned {}: {}", status, body);
        }

        Ok(())
    }
}

// -- Serde types for the SendGrid API --

#[derive(Debug, Serialize)]
pub struct MailSendRequest<'a> {
    pub personalizations: Vec<Personalization<'a>>,
    pub from: EmailAddress<'a>,
    pub subject: &'a str,
    pub content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Personalization<'a> {
    pub to: Vec<EmailAddress<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EmailAddress<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    #[serde(rename = "type")]
    pub content_type: &'a str,
    pub value: &'a str,
}

impl<'a> From<&'a OutgoingMessage> for MailSendRequest<'a> {
    fn from(message: &'a OutgoingMessage) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![EmailAddress { email: &message.to }],
            }],
            from: EmailAddress {
                email: &message.from,
            },
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/html",
                value: &message.html_body,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let message = OutgoingMessage {
            from: "digest@example.com".to_string(),
            to: "reader@example.com".to_string(),
            subject: "Eleven Digest Update".to_string(),
            html_body: "<p>hi</p>".to_string(),
        };
        let json = serde_json::to_value(MailSendRequest::from(&message)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "personalizations": [{"to": [{"email": "reader@example.com"}]}],
                "from": {"email": "digest@example.com"},
                "subject": "Eleven Digest Update",
                "content": [{"type": "text/html", "value": "<p>hi</p>"}]
            })
        );
    }
}
