use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{FullPost, Post, ThreadRef};

use super::ApiResult;
use crate::dto::{PostCreateBody, PostUpdateBody, PostsQuery, RelatedQuery};
use crate::web::AppState;

pub(crate) async fn create(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(body): Json<Vec<PostCreateBody>>,
) -> ApiResult<(StatusCode, Json<Vec<Post>>)> {
    let drafts = body.into_iter().map(Into::into).collect();
    let posts = state
        .service
        .posts
        .create_posts(&ThreadRef::parse(&slug_or_id), drafts)
        .await?;
    Ok((StatusCode::CREATED, Json(posts)))
}

pub(crate) async fn list(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Query(query): Query<PostsQuery>,
) -> ApiResult<Json<Vec<Post>>> {
    let page = query.into_page()?;
    let posts = state
        .service
        .posts
        .posts(&ThreadRef::parse(&slug_or_id), &page)
        .await?;
    Ok(Json(posts))
}

pub(crate) async fn details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RelatedQuery>,
) -> ApiResult<Json<FullPost>> {
    Ok(Json(state.service.posts.details(id, query.into()).await?))
}

pub(crate) async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PostUpdateBody>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.service.posts.edit(id, body.message).await?))
}
