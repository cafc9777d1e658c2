//! Resend HTTP API client

use async_trait::async_trait;
use forum_common::Environment;
use forum_core::DomainError;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::{EmailMessage, EmailSender};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends email through Resend
///
/// In development, a configured allow-listed recipient short-circuits every
/// other address, and delivery failures are logged instead of returned.
#[derive(Clone)]
pub struct ResendEmailSender {
    client: reqwest::Client,
    api_key: String,
    from: String,
    environment: Environment,
    dev_recipient: Option<String>,
}

impl ResendEmailSender {
    pub fn new(
        api_key: &str,
        from: &str,
        environment: Environment,
        dev_recipient: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            from: from.to_string(),
            environment,
            dev_recipient,
        }
    }

    /// True when development mode should not send to this address
    fn skips(&self, to: &str) -> bool {
        self.environment.is_development()
            && self
                .dev_recipient
                .as_deref()
                .is_some_and(|allowed| !allowed.eq_ignore_ascii_case(to))
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<(), DomainError> {
        let payload = ResendPayload {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::Email(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Email(format!("Resend returned {status}: {body}")));
        }

        Ok(())
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        if self.skips(&message.to) {
            warn!(
                allowed = ?self.dev_recipient,
                "Recipient not allowed in development, email skipped"
            );
            return Ok(());
        }

        match self.deliver(&message).await {
            Ok(()) => {
                info!(subject = %message.subject, "Email sent");
                Ok(())
            }
            Err(e) if self.environment.is_development() => {
                error!(error = %e, "Email delivery failed, ignored in development");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for ResendEmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendEmailSender")
            .field("api_key", &"[redacted]")
            .field("from", &self.from)
            .field("environment", &self.environment)
            .field("dev_recipient", &self.dev_recipient)
            .finish_non_exhaustive()
    }
}
