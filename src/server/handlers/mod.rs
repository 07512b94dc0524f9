//! HTTP handlers for the server.

pub mod frames;
pub mod plugins;
pub mod status;

use axum::http::StatusCode;

use crate::error::FlipdotError;

/// Error response: status plus plain-text message.
pub type ApiError = (StatusCode, String);

/// Map a library error onto a status code.
pub fn api_error(e: FlipdotError) -> ApiError {
    let status = match &e {
        FlipdotError::Plugin(_) | FlipdotError::InvalidFrame(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
