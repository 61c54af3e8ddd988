use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use domains::User;

use super::ApiResult;
use crate::dto::{UserCreateBody, UserUpdateBody};
use crate::web::error::creation_response;
use crate::web::AppState;

pub(crate) async fn create(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    Json(body): Json<UserCreateBody>,
) -> ApiResult<Response> {
    let creation = state.service.users.create(body.into_user(nickname)).await?;
    Ok(creation_response(creation))
}

pub(crate) async fn profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.service.users.profile(&nickname).await?))
}

pub(crate) async fn update_profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    Json(body): Json<UserUpdateBody>,
) -> ApiResult<Json<User>> {
    let user = state
        .service
        .users
        .update_profile(&nickname, body.into())
        .await?;
    Ok(Json(user))
}
