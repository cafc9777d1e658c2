//! Transactional email delivery
//!
//! Use cases only see the [`EmailSender`] trait. The binary picks
//! [`ResendEmailSender`] when an API key is configured and
//! [`LogEmailSender`] otherwise.

mod resend;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use forum_common::AppConfig;
use forum_core::DomainError;
use tracing::info;

pub use resend::ResendEmailSender;

/// A rendered email ready to hand to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver one message
    ///
    /// # Errors
    /// Returns `DomainError::Email` when the provider rejects the message
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError>;
}

/// Sender that only records the recipient and subject in the log
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        info!(to = %message.to, subject = %message.subject, "Email delivery disabled, message logged");
        Ok(())
    }
}

/// Choose the sender for the configured environment
pub fn sender_from_config(config: &AppConfig) -> Arc<dyn EmailSender> {
    match config.email.resend_api_key.as_deref() {
        Some(api_key) => Arc::new(ResendEmailSender::new(
            api_key,
            &config.email.from,
            config.app.env,
            config.email.dev_recipient.clone(),
        )),
        None => Arc::new(LogEmailSender),
    }
}
