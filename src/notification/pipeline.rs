//! Render-then-send pipeline for templated emails

use std::sync::Arc;

use thiserror::Error;

use crate::template::{TemplateError, TemplateService};

use super::sender::{EmailSender, SendError};
use super::types::{EmailMessage, SendEmailInput, SendReceipt};

/// Subject used when a template has no `subject` metadata
pub const DEFAULT_SUBJECT: &str = "New message";

/// Variable holding the recipient address
const RECIPIENT_FIELD: &str = "toEmail";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Template data has no 'toEmail' recipient")]
    MissingRecipient,

    #[error(transparent)]
    Send(#[from] SendError),
}

/// Renders a template and hands the resulting email to a sender
pub struct EmailPipeline {
    templates: TemplateService,
    sender: Arc<dyn EmailSender>,
    default_from: Option<String>,
}

impl EmailPipeline {
    pub fn new(templates: TemplateService, sender: Arc<dyn EmailSender>) -> Self {
        Self {
            templates,
            sender,
            default_from: None,
        }
    }

    /// Sender address for messages that do not set one
    pub fn with_default_from(mut self, from: Option<String>) -> Self {
        self.default_from = from.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn templates(&self) -> &TemplateService {
        &self.templates
    }

    /// Subject for `key`; a missing or empty sidecar subject falls back to [`DEFAULT_SUBJECT`]
    pub fn subject(&self, key: &str) -> Result<String, TemplateError> {
        let subject = self
            .templates
            .get_metadata(key)?
            .subject()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBJECT);

        Ok(subject.to_string())
    }

    /// Build the message for `input` without sending it
    pub fn compose(&self, input: SendEmailInput) -> Result<EmailMessage, PipelineError> {
        let html = self.templates.render(&input.template_key, &input.data)?;
        let subject = self.subject(&input.template_key)?;

        let to = input
            .data
            .get(RECIPIENT_FIELD)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|to| !to.is_empty())
            .ok_or(PipelineError::MissingRecipient)?
            .to_string();

        Ok(EmailMessage {
            to,
            from: self.default_from.clone(),
            subject,
            html,
            text: None,
            attachments: input.attachments,
        })
    }

    /// Render and send a templated email
    #[tracing::instrument(
        name = "email.send",
        skip(self, input),
        fields(template_key = %input.template_key, sender = self.sender.name())
    )]
    pub async fn send(&self, input: SendEmailInput) -> Result<SendReceipt, PipelineError> {
        let message = match self.compose(input) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(error = %e, "Failed to prepare email");
                return Err(e);
            }
        };

        let to = message.to.clone();
        match self.sender.send(message).await {
            Ok(receipt) => {
                tracing::info!(to = %to, message_id = %receipt.message_id, "Email queued to {}", to);
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!(to = %to, error = %e, "Failed to send email");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleOptions;
    use crate::notification::{Attachment, MemorySender};
    use crate::template::{TemplateCompiler, TemplateRegistry};
    use serde_json::json;

    fn pipeline(sender: Arc<MemorySender>) -> EmailPipeline {
        let compiler = TemplateCompiler::new();
        let mut registry = TemplateRegistry::new();
        registry
            .register(
                "order-placed",
                Arc::new(compiler.compile("order-placed", "Total {{total}}").unwrap()),
                json!({"subject": "Your order"}).as_object().unwrap().clone().into(),
            )
            .unwrap();
        registry
            .register(
                "auth-invite",
                Arc::new(compiler.compile("auth-invite", "Join: {{inviteUrl}}").unwrap()),
                Default::default(),
            )
            .unwrap();

        let templates = TemplateService::new(registry, ModuleOptions::default());
        EmailPipeline::new(templates, sender).with_default_from(Some("shop@example.com".into()))
    }

    #[tokio::test]
    async fn test_send_uses_metadata_subject() {
        let sender = Arc::new(MemorySender::new());
        let pipeline = pipeline(sender.clone());

        let input = SendEmailInput::new("order-placed", json!({"toEmail": "a@example.com", "total": 42}))
            .attachment(Attachment::new("invoice-1.pdf", "JVBERi0=", "application/pdf"));
        pipeline.send(input).await.unwrap();

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@example.com");
        assert_eq!(sent[0].from.as_deref(), Some("shop@example.com"));
        assert_eq!(sent[0].subject, "Your order");
        assert_eq!(sent[0].html, "Total 42");
        assert_eq!(sent[0].attachments.len(), 1);
    }

    #[tokio::test]
    async fn test_send_defaults_subject() {
        let sender = Arc::new(MemorySender::new());
        let pipeline = pipeline(sender.clone());

        let input = SendEmailInput::new(
            "auth-invite",
            json!({"toEmail": "b@example.com", "inviteUrl": "https://shop.test/app/invite"}),
        );
        pipeline.send(input).await.unwrap();

        assert_eq!(sender.sent()[0].subject, DEFAULT_SUBJECT);
    }

    #[test]
    fn test_empty_subject_falls_back() {
        let compiler = TemplateCompiler::new();
        let mut registry = TemplateRegistry::new();
        registry
            .register(
                "order-placed",
                Arc::new(compiler.compile("order-placed", "x").unwrap()),
                json!({"subject": ""}).as_object().unwrap().clone().into(),
            )
            .unwrap();
        let templates = TemplateService::new(registry, ModuleOptions::default());
        let pipeline = EmailPipeline::new(templates, Arc::new(MemorySender::new()));

        assert_eq!(pipeline.subject("order-placed").unwrap(), DEFAULT_SUBJECT);
        let message = pipeline
            .compose(SendEmailInput::new("order-placed", json!({"toEmail": "a@example.com"})))
            .unwrap();
        assert_eq!(message.subject, DEFAULT_SUBJECT);
    }

    #[tokio::test]
    async fn test_unknown_template_is_not_sent() {
        let sender = Arc::new(MemorySender::new());
        let pipeline = pipeline(sender.clone());

        let result = pipeline
            .send(SendEmailInput::new("missing", json!({"toEmail": "a@example.com"})))
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::Template(TemplateError::NotFound(_)))
        ));
        assert_eq!(sender.count(), 0);
    }

    #[test]
    fn test_missing_recipient() {
        let pipeline = pipeline(Arc::new(MemorySender::new()));

        let result = pipeline.compose(SendEmailInput::new("order-placed", json!({"total": 1})));
        assert!(matches!(result, Err(PipelineError::MissingRecipient)));
    }

    #[tokio::test]
    async fn test_missing_sender_address_is_rejected() {
        let sender = Arc::new(MemorySender::new());
        let pipeline = pipeline(sender.clone()).with_default_from(None);

        let result = pipeline
            .send(SendEmailInput::new("order-placed", json!({"toEmail": "a@example.com"})))
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::Send(SendError::InvalidMessage(_)))
        ));
    }
}
