use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use domains::{Thread, ThreadRef};

use super::ApiResult;
use crate::dto::{ThreadCreateBody, ThreadUpdateBody, VoteBody};
use crate::web::error::creation_response;
use crate::web::AppState;

pub(crate) async fn create(
    State(state): State<AppState>,
    Path(forum): Path<String>,
    Json(body): Json<ThreadCreateBody>,
) -> ApiResult<Response> {
    let creation = state.service.threads.create(&forum, body.into()).await?;
    Ok(creation_response(creation))
}

pub(crate) async fn details(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    let thread = state
        .service
        .threads
        .details(&ThreadRef::parse(&slug_or_id))
        .await?;
    Ok(Json(thread))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(body): Json<ThreadUpdateBody>,
) -> ApiResult<Json<Thread>> {
    let thread = state
        .service
        .threads
        .update(&ThreadRef::parse(&slug_or_id), body.into())
        .await?;
    Ok(Json(thread))
}

pub(crate) async fn vote(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(body): Json<VoteBody>,
) -> ApiResult<Json<Thread>> {
    let thread = state
        .service
        .threads
        .vote(&ThreadRef::parse(&slug_or_id), &body.nickname, body.voice)
        .await?;
    Ok(Json(thread))
}
