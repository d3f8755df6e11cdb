//! Outbound email types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File attached to an outbound email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient
    pub filename: String,

    /// Base64 encoded content
    pub content: String,

    /// MIME type (e.g. "application/pdf")
    pub content_type: String,

    /// Content disposition, "attachment" unless stated otherwise
    #[serde(default = "default_disposition")]
    pub disposition: String,

    /// Content ID for inline attachments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn default_disposition() -> String {
    "attachment".to_string()
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            content_type: content_type.into(),
            disposition: default_disposition(),
            id: None,
        }
    }
}

/// Request to render a template and send the result as an email
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailInput {
    /// Template key to render
    pub template_key: String,

    /// Template variables; must contain `toEmail`
    pub data: serde_json::Value,

    /// Files to attach (optional)
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl SendEmailInput {
    pub fn new(template_key: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            template_key: template_key.into(),
            data,
            attachments: Vec::new(),
        }
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A fully rendered email handed to an [`EmailSender`](super::EmailSender)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    pub subject: String,

    pub html: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Acknowledgement returned by a sender once a message is accepted
#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub message_id: Uuid,
    pub queued_at: DateTime<Utc>,
}

impl SendReceipt {
    pub fn new() -> Self {
        Self {
            message_id: Uuid::new_v4(),
            queued_at: Utc::now(),
        }
    }
}

impl Default for SendReceipt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attachment_default_disposition() {
        let attachment: Attachment = serde_json::from_value(json!({
            "filename": "invoice-1.pdf",
            "content": "JVBERi0=",
            "content_type": "application/pdf"
        }))
        .unwrap();

        assert_eq!(attachment.disposition, "attachment");
        assert_eq!(attachment, Attachment::new("invoice-1.pdf", "JVBERi0=", "application/pdf"));
    }

    #[test]
    fn test_send_input_without_attachments() {
        let input: SendEmailInput = serde_json::from_value(json!({
            "template_key": "auth-invite",
            "data": {"toEmail": "a@example.com"}
        }))
        .unwrap();

        assert_eq!(input.template_key, "auth-invite");
        assert!(input.attachments.is_empty());
    }
}
