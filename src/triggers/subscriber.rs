//! Event subscribers that turn commerce events into templated emails

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::notification::{Attachment, EmailPipeline, PipelineError, SendEmailInput};

use super::events::{
    CommerceEvent, EventOutcome, InviteCreatedPayload, OrderPlacedPayload, PasswordResetPayload,
    AUTH_PASSWORD_RESET, INVITE_CREATED, ORDER_PLACED,
};

const ORDER_PLACED_TEMPLATE: &str = "order-placed";
const PASSWORD_RESET_TEMPLATE: &str = "auth-password-reset";
const INVITE_TEMPLATE: &str = "auth-invite";

#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("Invalid payload for '{event}': {source}")]
    InvalidPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build link: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to generate invoice PDF: {0}")]
    Invoice(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Companion capability producing invoice PDFs for orders
#[async_trait]
pub trait InvoiceGenerator: Send + Sync {
    /// Raw PDF bytes for the order's invoice
    async fn generate_invoice(&self, order: &OrderPlacedPayload) -> anyhow::Result<Vec<u8>>;
}

/// Dispatches commerce events to the matching email
pub struct EventSubscriber {
    pipeline: Arc<EmailPipeline>,
    invoices: Option<Arc<dyn InvoiceGenerator>>,
    public_url: Option<String>,
}

impl EventSubscriber {
    pub fn new(pipeline: Arc<EmailPipeline>) -> Self {
        Self {
            pipeline,
            invoices: None,
            public_url: None,
        }
    }

    /// Backend URL used for invite and password reset links
    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_invoice_generator(mut self, invoices: Arc<dyn InvoiceGenerator>) -> Self {
        self.invoices = Some(invoices);
        self
    }

    /// Handle a single event
    #[tracing::instrument(name = "event.handle", skip(self, event), fields(event = %event.name))]
    pub async fn handle(&self, event: CommerceEvent) -> Result<EventOutcome, SubscriberError> {
        let name = event.name.trim();

        if !matches!(name, ORDER_PLACED | AUTH_PASSWORD_RESET | INVITE_CREATED) {
            tracing::debug!("No subscriber for event");
            return Ok(EventOutcome::Unsupported);
        }

        if !self.pipeline.templates().is_event_enabled(name) {
            tracing::info!("Event not listed in config. Skipping.");
            return Ok(EventOutcome::skipped("event not enabled"));
        }

        match name {
            ORDER_PLACED => self.order_placed(parse(name, event.data)?).await,
            AUTH_PASSWORD_RESET => self.password_reset(parse(name, event.data)?).await,
            _ => self.invite_created(parse(name, event.data)?).await,
        }
    }

    async fn order_placed(&self, order: OrderPlacedPayload) -> Result<EventOutcome, SubscriberError> {
        let mut input = SendEmailInput::new(
            ORDER_PLACED_TEMPLATE,
            json!({
                "toEmail": order.email,
                "total": order.total,
                "currency": order.currency_code,
            }),
        );

        if self.pipeline.templates().send_invoice_on_order() {
            match &self.invoices {
                Some(invoices) => input = input.attachment(invoice_attachment(invoices.as_ref(), &order).await?),
                None => tracing::warn!(
                    order_id = %order.id,
                    "Invoice requested but no invoice generator is configured, sending without it"
                ),
            }
        }

        tracing::info!(order_id = %order.id, "Sending order confirmation email...");
        self.send(input).await
    }

    async fn password_reset(
        &self,
        payload: PasswordResetPayload,
    ) -> Result<EventOutcome, SubscriberError> {
        let Some(base) = self.public_url.as_deref() else {
            tracing::warn!("Public URL is not defined, cannot build reset link");
            return Ok(EventOutcome::skipped("public url not configured"));
        };

        let reset_url = build_link(base, "app/reset-password", &payload.token, &payload.entity_id)?;

        tracing::info!("Sending password reset email...");
        self.send(SendEmailInput::new(
            PASSWORD_RESET_TEMPLATE,
            json!({
                "toEmail": payload.entity_id,
                "resetUrl": reset_url,
            }),
        ))
        .await
    }

    async fn invite_created(
        &self,
        payload: InviteCreatedPayload,
    ) -> Result<EventOutcome, SubscriberError> {
        let Some(base) = self.public_url.as_deref() else {
            tracing::warn!("Public URL is not defined, cannot build invite link");
            return Ok(EventOutcome::skipped("public url not configured"));
        };

        let invite_url = build_link(base, "app/invite", &payload.token, &payload.email)?;

        tracing::info!(invite_id = %payload.id, "Sending invite email...");
        self.send(SendEmailInput::new(
            INVITE_TEMPLATE,
            json!({
                "toEmail": payload.email,
                "inviteUrl": invite_url,
            }),
        ))
        .await
    }

    async fn send(&self, input: SendEmailInput) -> Result<EventOutcome, SubscriberError> {
        let template_key = input.template_key.clone();
        let receipt = self.pipeline.send(input).await?;

        Ok(EventOutcome::Sent {
            template_key,
            message_id: receipt.message_id,
        })
    }
}

fn parse<T: DeserializeOwned>(event: &str, data: serde_json::Value) -> Result<T, SubscriberError> {
    serde_json::from_value(data).map_err(|source| SubscriberError::InvalidPayload {
        event: event.to_string(),
        source,
    })
}

async fn invoice_attachment(
    invoices: &dyn InvoiceGenerator,
    order: &OrderPlacedPayload,
) -> Result<Attachment, SubscriberError> {
    let pdf = invoices.generate_invoice(order).await.map_err(|e| {
        tracing::error!(order_id = %order.id, error = %e, "Failed to generate PDF invoice");
        SubscriberError::Invoice(e.to_string())
    })?;

    if pdf.is_empty() {
        return Err(SubscriberError::Invoice(
            "generated invoice buffer is empty".to_string(),
        ));
    }

    Ok(Attachment::new(
        format!("invoice-{}.pdf", order.id),
        base64::engine::general_purpose::STANDARD.encode(pdf),
        "application/pdf",
    ))
}

/// `<base>/<path>?token=..&email=..` with both values percent-encoded (space is `%20`)
fn build_link(base: &str, path: &str, token: &str, email: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))?;
    url.set_query(Some(&format!(
        "token={}&email={}",
        urlencoding::encode(token),
        urlencoding::encode(email)
    )));
    Ok(url.into())
}
