//! HTTP transport.
//!
//! A thin axum layer over [`ThumbnailService`]:
//!
//! - `GET /` — usage hint.
//! - `GET /images?filename=<id>&width=<px>&height=<px>` — JPEG bytes.
//!
//! Raw query strings are checked with the validator before the orchestrator
//! is called, so malformed requests never reach the blocking pool. The
//! orchestrator's [`ServiceError`] is the only thing inspected when choosing
//! a status code:
//!
//! | Failure | Status | Body |
//! |---|---|---|
//! | missing parameter, unreadable query | 400 | `Missing required parameters: ...` |
//! | `INVALID_FILENAME` / `INVALID_DIMENSIONS` | 400 | validator message |
//! | `FILE_NOT_FOUND` | 404 | `Image not found` |
//! | `PROCESSING_ERROR` | 422 | `Image processing failed` |
//! | `READ_ERROR` | 500 | `Error accessing image file` |
//! | anything else | 500 | `Internal server error` |
//!
//! Error bodies are JSON: `{"error": "..."}`. A key given more than once has
//! its values joined with `,`, which no validator accepts.

use crate::error::ServiceError;
use crate::imaging::ImageBackend;
use crate::service::{CacheStatus, ThumbnailService};
use crate::validation::{validate_dimension, validate_identifier};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

pub const USAGE: &str = "Use /images?filename=fjord&width=200&height=200";

const MISSING_PARAMS: &str =
    "Missing required parameters: filename, width, and height are all required";
const INVALID_FILENAME: &str =
    "Invalid filename. Only alphanumeric characters, hyphens, and underscores are allowed";
const INVALID_WIDTH: &str = "Invalid width. Must be a positive integer between 1 and 5000";
const INVALID_HEIGHT: &str = "Invalid height. Must be a positive integer between 1 and 5000";

/// Raw query parameters. Everything is optional here so that a missing
/// parameter produces our own 400 rather than an extractor rejection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImageQuery {
    pub filename: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ImageQuery {
    /// Collect the known keys from decoded query pairs; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "filename" => &mut query.filename,
                "width" => &mut query.width,
                "height" => &mut query.height,
                _ => continue,
            };
            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value),
            }
        }
        query
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Status code for each taxonomy kind.
pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidFilename(_) | ServiceError::InvalidDimensions(_) => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::FileNotFound => StatusCode::NOT_FOUND,
        ServiceError::ProcessingError => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::ReadError | ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::InvalidFilename(msg) | Self::InvalidDimensions(msg) => msg,
            Self::FileNotFound => "Image not found",
            Self::ProcessingError => "Image processing failed",
            Self::ReadError => "Error accessing image file",
            Self::Internal => "Internal server error",
        };
        error_response(status_for(&self), message)
    }
}

/// Build the application router around a shared service.
pub fn router<B: ImageBackend + 'static>(service: Arc<ThumbnailService<B>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/images", get(get_image::<B>))
        .with_state(service)
}

async fn index() -> &'static str {
    USAGE
}

#[tracing::instrument(skip(service))]
async fn get_image<B: ImageBackend + 'static>(
    State(service): State<Arc<ThumbnailService<B>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(pairs)) => ImageQuery::from_pairs(pairs),
        Err(rejection) => {
            debug!(error = %rejection, "unreadable query string");
            return error_response(StatusCode::BAD_REQUEST, MISSING_PARAMS);
        }
    };
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(filename), Some(width), Some(height)) = (
        non_empty(query.filename),
        non_empty(query.width),
        non_empty(query.height),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_PARAMS);
    };

    if !validate_identifier(&filename) {
        return error_response(StatusCode::BAD_REQUEST, INVALID_FILENAME);
    }
    let Some(width) = validate_dimension(&width) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_WIDTH);
    };
    let Some(height) = validate_dimension(&height) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_HEIGHT);
    };

    let svc = Arc::clone(&service);
    let id = filename.clone();
    let result =
        tokio::task::spawn_blocking(move || svc.resize_or_fetch(&id, width.get(), height.get()))
            .await;

    match result {
        Ok(Ok(thumb)) => {
            match thumb.cache {
                CacheStatus::Hit => debug!(%filename, %width, %height, "served from cache"),
                CacheStatus::Miss => info!(%filename, %width, %height, "generated thumbnail"),
            }
            ([(header::CONTENT_TYPE, "image/jpeg")], thumb.bytes).into_response()
        }
        Ok(Err(err)) => {
            if err.is_validation() {
                debug!(%filename, code = err.code(), "request rejected");
            } else {
                warn!(%filename, code = err.code(), "request failed");
            }
            err.into_response()
        }
        Err(join_err) => {
            error!(error = %join_err, "resize task did not complete");
            ServiceError::Internal.into_response()
        }
    }
}

/// Serve until Ctrl-C.
pub async fn serve<B: ImageBackend + 'static>(
    listener: TcpListener,
    service: Arc<ThumbnailService<B>>,
) -> std::io::Result<()> {
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
