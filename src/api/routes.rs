use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};
use crate::triggers::receive_event;

use super::health::health;
use super::template::{get_template, list_templates, render_template};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        .nest(
            "/api/v1",
            Router::new()
                // Templates
                .route("/templates", get(list_templates))
                .route("/templates/{key}", get(get_template))
                .route("/templates/{key}/render", post(render_template))
                // Event ingestion
                .route("/events", post(receive_event))
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
