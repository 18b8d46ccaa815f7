//! Error → HTTP mapping
//!
//! Every failure leaves the API as
//! `{"error": {"code", "message", "entity_id", "request_id"}}` with a
//! status chosen by the error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use innkeep_core::errors::{ExError, ExErrorKind};
use serde::Serialize;

use crate::request_id::current_request_id;

#[derive(Debug)]
pub struct ApiError(pub ExError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'static str,
    message: &'a str,
    entity_id: Option<&'a str>,
    request_id: Option<String>,
}

pub fn status_for(kind: ExErrorKind) -> StatusCode {
    match kind {
        ExErrorKind::NotFound => StatusCode::NOT_FOUND,
        ExErrorKind::InvalidInput
        | ExErrorKind::Unbalanced
        | ExErrorKind::AccountMismatch
        | ExErrorKind::PaymentExceedsBalance
        | ExErrorKind::InsufficientLeaveBalance
        | ExErrorKind::CapacityExceeded
        | ExErrorKind::Serialization => StatusCode::UNPROCESSABLE_ENTITY,
        ExErrorKind::AlreadyExists
        | ExErrorKind::Conflict
        | ExErrorKind::InvalidTransition
        | ExErrorKind::InUse
        | ExErrorKind::RoomUnavailable => StatusCode::CONFLICT,
        ExErrorKind::Io
        | ExErrorKind::Persistence
        | ExErrorKind::Config
        | ExErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        let request_id = self
            .0
            .request_id()
            .cloned()
            .or_else(current_request_id)
            .map(|id| id.to_string());
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.0.code(),
                message: self.0.message(),
                entity_id: self.0.entity_id(),
                request_id,
            },
        };
        (status, Json(body)).into_response()
    }
}
