use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::{Creation, DomainError, ResponseStatus};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A [`DomainError`] on its way out as an HTTP response.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

pub(crate) fn status_code(status: ResponseStatus) -> StatusCode {
    match status {
        ResponseStatus::Created => StatusCode::CREATED,
        ResponseStatus::Ok => StatusCode::OK,
        ResponseStatus::Conflict => StatusCode::CONFLICT,
        ResponseStatus::NotFound => StatusCode::NOT_FOUND,
        ResponseStatus::BadRequest => StatusCode::BAD_REQUEST,
        ResponseStatus::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(self.0.status());
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// 201 with the new entity, or 409 with what already held the key.
pub(crate) fn creation_response<T, C>(creation: Creation<T, C>) -> Response
where
    T: Serialize,
    C: Serialize,
{
    let status = status_code(creation.status());
    match creation {
        Creation::Created(created) => (status, Json(created)).into_response(),
        Creation::Conflict(existing) => (status, Json(existing)).into_response(),
    }
}
