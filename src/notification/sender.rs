//! Transport abstraction for outbound email.
//!
//! The pipeline only depends on [`EmailSender`]; delivering mail over the
//! network belongs to whichever provider implements it.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{EmailMessage, SendReceipt};

/// Errors that can occur while handing a message to a sender.
#[derive(Debug, Error)]
pub enum SendError {
    /// The message is missing something the provider requires
    #[error("Invalid email: {0}")]
    InvalidMessage(String),

    /// The provider refused or failed to accept the message
    #[error("Failed to send email: {0}")]
    Provider(String),
}

/// Something that accepts rendered emails for delivery.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Hand a message over for delivery
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, SendError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Reject messages a provider could never deliver.
pub fn validate_message(message: &EmailMessage) -> Result<(), SendError> {
    if message.to.trim().is_empty() {
        return Err(SendError::InvalidMessage("recipient is required".to_string()));
    }

    match message.from.as_deref().map(str::trim) {
        Some(from) if !from.is_empty() => Ok(()),
        _ => Err(SendError::InvalidMessage("sender address is required".to_string())),
    }
}

/// Sender that only logs messages; used when no provider is wired in.
#[derive(Debug, Default)]
pub struct LogSender;

impl LogSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailSender for LogSender {
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, SendError> {
        validate_message(&message)?;

        let receipt = SendReceipt::new();
        tracing::info!(
            message_id = %receipt.message_id,
            to = %message.to,
            subject = %message.subject,
            attachments = message.attachments.len(),
            html_len = message.html.len(),
            "Email accepted by log sender"
        );

        Ok(receipt)
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Sender that keeps every accepted message in memory.
#[derive(Debug, Default)]
pub struct MemorySender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages accepted so far, oldest first
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }
}

#[async_trait]
impl EmailSender for MemorySender {
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, SendError> {
        validate_message(&message)?;

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| SendError::Provider("memory sender poisoned".to_string()))?;
        sent.push(message);

        Ok(SendReceipt::new())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str, from: Option<&str>) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            from: from.map(str::to_string),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
            text: None,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_validate_message() {
        assert!(validate_message(&message("a@example.com", Some("shop@example.com"))).is_ok());
        assert!(matches!(
            validate_message(&message("", Some("shop@example.com"))),
            Err(SendError::InvalidMessage(_))
        ));
        assert!(matches!(
            validate_message(&message("a@example.com", None)),
            Err(SendError::InvalidMessage(_))
        ));
        assert!(matches!(
            validate_message(&message("a@example.com", Some("  "))),
            Err(SendError::InvalidMessage(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_sender_records_messages() {
        let sender = MemorySender::new();

        tokio_test::assert_ok!(
            sender
                .send(message("a@example.com", Some("shop@example.com")))
                .await
        );
        tokio_test::assert_err!(sender.send(message("b@example.com", None)).await);

        assert_eq!(sender.count(), 1);
        assert_eq!(sender.sent()[0].to, "a@example.com");
    }

    #[tokio::test]
    async fn test_log_sender_validates() {
        let sender = LogSender::new();

        assert!(sender
            .send(message("a@example.com", Some("shop@example.com")))
            .await
            .is_ok());
        assert!(sender.send(message("", Some("shop@example.com"))).await.is_err());
    }
}
