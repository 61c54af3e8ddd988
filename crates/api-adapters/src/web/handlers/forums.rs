use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use domains::{Forum, Thread, User};

use super::ApiResult;
use crate::dto::{ForumCreateBody, ThreadsQuery, UsersQuery};
use crate::web::error::creation_response;
use crate::web::AppState;

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(body): Json<ForumCreateBody>,
) -> ApiResult<Response> {
    let creation = state.service.forums.create(body).await?;
    Ok(creation_response(creation))
}

pub(crate) async fn details(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Forum>> {
    Ok(Json(state.service.forums.details(&slug).await?))
}

pub(crate) async fn threads(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ThreadsQuery>,
) -> ApiResult<Json<Vec<Thread>>> {
    let threads = state.service.forums.threads(&slug, &query.into()).await?;
    Ok(Json(threads))
}

pub(crate) async fn users(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<UsersQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.service.forums.users(&slug, &query.into()).await?;
    Ok(Json(users))
}
