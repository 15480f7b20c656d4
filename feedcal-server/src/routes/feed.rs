//! Published feed endpoint

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use feedcal_core::ics::encode;
use tracing::error;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/feed.ics", get(feed))
}

/// GET /feed.ics - Every active event as one calendar
async fn feed(State(state): State<AppState>) -> Response {
    let records = match state.blocking(|store| store.list_active()).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to load events for feed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error generating feed").into_response();
        }
    };

    let headers = [
        (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
        (
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.config.feed_max_age),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.config.feed_filename),
        ),
    ];

    (headers, encode(&records)).into_response()
}
