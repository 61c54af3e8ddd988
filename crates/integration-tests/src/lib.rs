//! Fixtures shared by the end-to-end tests: a router over a private
//! store, and a JSON request helper.

use std::sync::Arc;
use std::time::Duration;

use api_adapters::{router, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use services::AggregateService;
use storage_adapters::{SqliteStore, StoreSettings};
use tempfile::TempDir;
use tower::ServiceExt;

pub use serde_json;

/// A test client; clones share the same store.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

/// A WAL database file with a multi-connection pool, so writers really
/// contend. The file lives as long as the returned [`TempDir`].
pub async fn file_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("forum.db").display());
    let settings = StoreSettings {
        max_connections: 8,
        busy_timeout: Duration::from_secs(10),
    };
    let store = SqliteStore::connect(&url, &settings).await.expect("file store");
    (dir, store)
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = SqliteStore::in_memory().await.expect("in-memory store");
        Self::with_store(store)
    }

    pub fn with_store(store: SqliteStore) -> Self {
        let service = AggregateService::new(Arc::new(store));
        Self {
            router: router(AppState::new(service)),
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("valid request");

        let response = self.router.clone().oneshot(request).await.expect("infallible router");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn create_user(&self, nickname: &str) -> Value {
        let (status, body) = self
            .post(
                &format!("/api/user/{nickname}/create"),
                json!({
                    "fullname": format!("{nickname} Full"),
                    "about": "",
                    "email": format!("{nickname}@forum.test"),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn create_forum(&self, slug: &str, owner: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/forum/create",
                json!({ "title": format!("{slug} forum"), "user": owner, "slug": slug }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn create_thread(&self, forum: &str, author: &str, slug: Option<&str>) -> Value {
        let mut body = json!({ "title": "A thread", "author": author, "message": "Opening post" });
        if let Some(slug) = slug {
            body["slug"] = json!(slug);
        }
        let (status, body) = self.post(&format!("/api/forum/{forum}/create"), body).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    /// Posts one batch and returns the created ids in order.
    pub async fn create_posts(&self, thread: &str, posts: Value) -> Vec<i64> {
        let (status, body) = self.post(&format!("/api/thread/{thread}/create"), posts).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        ids(&body)
    }

    /// One user, one forum `rust`, one thread `borrowck`.
    pub async fn seeded() -> Self {
        let app = Self::spawn().await;
        app.seed().await;
        app
    }

    pub async fn seed(&self) {
        self.create_user("ferris").await;
        self.create_forum("rust", "ferris").await;
        self.create_thread("rust", "ferris", Some("borrowck")).await;
    }
}

/// The `id` field of every element of a JSON array.
pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}
