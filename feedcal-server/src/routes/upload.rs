//! Calendar upload endpoint

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        State,
        multipart::{Multipart, MultipartError, MultipartRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use feedcal_core::config::FeedConfig;
use feedcal_core::ics::decode;
use feedcal_core::import::import_events;
use serde::Serialize;
use tracing::info;

use crate::routes::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload))
}

/// Response from a successful upload
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub events_added: usize,
    pub events_updated: usize,
    pub feed_url: String,
}

/// POST /api/upload - Import the `file` field of a multipart form
async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("multipart/form-data"));
    if !is_multipart {
        return Ok((
            StatusCode::BAD_REQUEST,
            "Content-Type must be multipart/form-data",
        )
            .into_response());
    }

    let mut multipart = multipart.map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, "INVALID_FORMAT", e.body_text())
    })?;

    let bytes = read_file_field(&mut multipart, state.config.max_upload_bytes)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "MISSING_FILE", "No file provided"))?;

    let text = String::from_utf8_lossy(&bytes);
    let decoded = decode(&text)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, "INVALID_FORMAT", e.to_string()))?;

    if decoded.events.is_empty() {
        return Ok(Json(UploadResponse {
            success: true,
            events_added: 0,
            events_updated: 0,
            feed_url: String::new(),
        })
        .into_response());
    }

    let events = decoded.events;
    let summary = state
        .blocking(move |store| import_events(store, &events))
        .await?;

    info!(
        added = summary.added,
        updated = summary.updated,
        skipped = decoded.skipped.len(),
        "Upload imported"
    );

    Ok(Json(UploadResponse {
        success: true,
        events_added: summary.added,
        events_updated: summary.updated,
        feed_url: feed_url(&state.config, &headers),
    })
    .into_response())
}

/// Read the first file field named `file`. None if the form has none.
async fn read_file_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<Bytes>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Plain text fields named `file` don't count as an upload
        if field.name() != Some("file") || field.file_name().is_none() {
            continue;
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > max_bytes {
            return Err(file_too_large());
        }
        return Ok(Some(bytes));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        file_too_large()
    } else {
        ApiError::new(StatusCode::BAD_REQUEST, "INVALID_FORMAT", err.body_text())
    }
}

fn file_too_large() -> ApiError {
    ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", "File too large")
}

/// Where the feed can be subscribed to: `public_url` if configured,
/// otherwise the host the upload came in on.
fn feed_url(config: &FeedConfig, headers: &HeaderMap) -> String {
    let base = match &config.public_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(&config.bind_addr);
            format!("http://{}", host)
        }
    };

    format!("{}/feed.ics", base)
}
