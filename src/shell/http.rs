use axum::{Router, routing::post};

use crate::modules::event_log::use_cases::append_events::inbound::gateway as gateway_inbound;
use crate::modules::event_log::use_cases::append_events::inbound::http as http_inbound;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/invoke",
            post(gateway_inbound::handle).options(http_inbound::handle),
        )
        .fallback(http_inbound::handle)
        .with_state(state)
}
