//! # axum delivery layer
//!
//! Routes live under `/api`. Every handler is a thin translation between
//! HTTP and one [`AggregateService`] call.

mod error;
mod handlers;
mod middleware;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use services::AggregateService;
use tower_http::trace::TraceLayer;

use crate::metrics::HttpMetrics;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AggregateService>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    pub fn new(service: AggregateService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: Arc::new(HttpMetrics::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/user/{nickname}/create", post(handlers::users::create))
        .route(
            "/user/{nickname}/profile",
            get(handlers::users::profile).post(handlers::users::update_profile),
        )
        .route("/forum/create", post(handlers::forums::create))
        .route("/forum/{slug}/details", get(handlers::forums::details))
        .route("/forum/{slug}/create", post(handlers::threads::create))
        .route("/forum/{slug}/threads", get(handlers::forums::threads))
        .route("/forum/{slug}/users", get(handlers::forums::users))
        .route(
            "/thread/{slug_or_id}/details",
            get(handlers::threads::details).post(handlers::threads::update),
        )
        .route("/thread/{slug_or_id}/create", post(handlers::posts::create))
        .route("/thread/{slug_or_id}/posts", get(handlers::posts::list))
        .route("/thread/{slug_or_id}/vote", post(handlers::threads::vote))
        .route(
            "/post/{id}/details",
            get(handlers::posts::details).post(handlers::posts::edit),
        )
        .route("/service/status", get(handlers::service::status))
        .route("/service/clear", post(handlers::service::clear))
        .route("/metrics", get(handlers::service::metrics))
        .route_layer(axum::middleware::from_fn_with_state(
            state.metrics.clone(),
            middleware::track_requests,
        ));

    Router::new()
        .nest("/api", api)
        .layer(middleware::cors_policy())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
