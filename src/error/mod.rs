use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::notification::{PipelineError, SendError};
use crate::template::TemplateError;
use crate::triggers::SubscriberError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Subscriber(#[from] SubscriberError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

fn template_status(err: &TemplateError) -> (StatusCode, &'static str) {
    match err {
        TemplateError::NotFound(_) => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
        TemplateError::InvalidKey(_) => (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE_KEY"),
        TemplateError::Compile { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_COMPILE_ERROR"),
        TemplateError::Render { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "RENDER_FAILED"),
    }
}

fn pipeline_status(err: &PipelineError) -> (StatusCode, &'static str) {
    match err {
        PipelineError::Template(e) => template_status(e),
        PipelineError::MissingRecipient => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        PipelineError::Send(SendError::InvalidMessage(_)) => {
            (StatusCode::BAD_REQUEST, "INVALID_EMAIL")
        }
        PipelineError::Send(SendError::Provider(_)) => (StatusCode::BAD_GATEWAY, "SEND_FAILED"),
    }
}

impl AppError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Template(e) => template_status(e),
            AppError::Subscriber(e) => match e {
                SubscriberError::InvalidPayload { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_EVENT_PAYLOAD")
                }
                SubscriberError::InvalidUrl(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
                }
                SubscriberError::Invoice(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INVOICE_FAILED")
                }
                SubscriberError::Pipeline(e) => pipeline_status(e),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let log_message = self.to_string();

        // Server-side details stay out of production responses
        let client_message = if status.is_server_error() && is_production() {
            "Internal server error".to_string()
        } else {
            log_message.clone()
        };

        // Always log the detailed error server-side
        if status.is_server_error() {
            tracing::error!(code = %code, status = %status.as_u16(), message = %log_message, "API error");
        } else {
            tracing::warn!(code = %code, status = %status.as_u16(), message = %log_message, "API error");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
