//! Templated email delivery.
//!
//! - `types`: outbound message, attachment and send request types
//! - `sender`: the [`EmailSender`] transport seam and its in-process implementations
//! - `pipeline`: renders a template through [`TemplateService`](crate::template::TemplateService)
//!   and hands the email to a sender

mod pipeline;
mod sender;
mod types;

pub use pipeline::{EmailPipeline, PipelineError, DEFAULT_SUBJECT};
pub use sender::{validate_message, EmailSender, LogSender, MemorySender, SendError};
pub use types::{Attachment, EmailMessage, SendEmailInput, SendReceipt};
