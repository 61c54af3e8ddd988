use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::StoreStatus;

use super::ApiResult;
use crate::metrics::CONTENT_TYPE;
use crate::web::AppState;

pub(crate) async fn status(State(state): State<AppState>) -> ApiResult<Json<StoreStatus>> {
    Ok(Json(state.service.admin.status().await?))
}

pub(crate) async fn clear(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.service.admin.clear().await?;
    Ok(StatusCode::OK)
}

pub(crate) async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
