// Mail sender trait: the swap-ready abstraction over the email provider.
//
// The dispatcher only needs "send this message to this address". SendGrid is
// the production implementation; tests record or fail sends with fakes.

use anyhow::Result;
use async_trait::async_trait;

/// A fully rendered message addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Sends one message per call. Implementations must be async because
/// providers are reached over HTTP.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;
}
