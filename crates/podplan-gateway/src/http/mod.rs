//! HTTP handlers. Every page handler answers with a [`page::Page`] carrying
//! the calendar sidebar; form POSTs answer with `303 See Other`.

pub mod calendar;
pub mod episodes;
pub mod health;
pub mod page;
pub mod podcasts;

use axum::{http::StatusCode, Json};
use podplan_calendar::{CalendarError, SourceError};
use podplan_store::StoreError;
use serde_json::{json, Value};
use tracing::warn;

pub type HandlerError = (StatusCode, Json<Value>);
pub type HandlerResult<T> = Result<T, HandlerError>;

fn error_body(status: StatusCode, message: String) -> HandlerError {
    (status, Json(json!({ "error": message })))
}

/// 500 carrying the store error message.
pub(crate) fn store_error(e: StoreError) -> HandlerError {
    warn!(error = %e, "store operation failed");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// 400 for malformed navigation or date parameters, 500 when the
/// episode source itself failed.
pub(crate) fn calendar_error(e: CalendarError) -> HandlerError {
    match e {
        CalendarError::Source(SourceError::Backend(_)) => {
            warn!(error = %e, "calendar source failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        other => bad_request(other),
    }
}

pub(crate) fn bad_request(e: impl std::fmt::Display) -> HandlerError {
    warn!(error = %e, "rejected request parameters");
    error_body(StatusCode::BAD_REQUEST, e.to_string())
}
