// Dispatch: mail the rendered digest to every subscriber.
//
// Sends are sequential. A failed address is logged and recorded, and the
// loop moves on; nothing is retried or rolled back.

use tracing::{info, warn};

use crate::mail::traits::{MailSender, OutgoingMessage};

/// An address the provider refused or couldn't be reached for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFailure {
    pub address: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<String>,
    pub failed: Vec<SendFailure>,
}

/// Send the same subject and body to each address.
pub async fn dispatch(
    sender: &dyn MailSender,
    from: &str,
    subject: &str,
    html_body: &str,
    subscribers: &[String],
) -> DispatchReport {
    info!("Sending emails to [{}]", subscribers.join(", "));

    let mut report = DispatchReport::default();

    for address in subscribers {
        let message = OutgoingMessage {
            from: from.to_string(),
            to: address.clone(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        };

        match sender.send(&message).await {
            Ok(()) => {
                info!(to = %address, "Digest sent");
                report.delivered.push(address.clone());
            }
            Err(e) => {
                let error = format!("{e:#}");
                warn!(to = %address, error = %error, "Failed to send digest");
                report.failed.push(SendFailure {
                    address: address.clone(),
                    error,
                });
            }
        }
    }

    report
}
