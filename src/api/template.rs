//! Template inspection and preview endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::server::AppState;
use crate::template::{TemplateListResponse, TemplateSummary};

#[derive(Debug, Serialize)]
pub struct RenderedTemplateResponse {
    pub key: String,
    pub subject: String,
    pub html: String,
}

/// GET /api/v1/templates - List all registered templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.templates.summaries();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{key} - Get a template's metadata
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TemplateSummary>> {
    let metadata = state.templates.get_metadata(&key)?.clone();

    Ok(Json(TemplateSummary { key, metadata }))
}

/// POST /api/v1/templates/{key}/render - Render a template without sending it
#[tracing::instrument(name = "http.render_template", skip(state, vars))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(vars): Json<serde_json::Value>,
) -> Result<Json<RenderedTemplateResponse>> {
    let html = state.templates.render(&key, &vars)?;
    let subject = state.pipeline.subject(&key)?;

    Ok(Json(RenderedTemplateResponse { key, subject, html }))
}
