use axum::http::StatusCode;
use integration_tests::serde_json::{json, Value};
use integration_tests::{ids, TestApp};

fn reply(parent: i64) -> Value {
    json!({ "parent": parent, "author": "ferris", "message": format!("re: {parent}") })
}

/// 1 -> (2 -> 4, 5), 3 -> 6
async fn forest(app: &TestApp) -> Vec<i64> {
    let roots = app
        .create_posts("borrowck", json!([reply(0), reply(0)]))
        .await;
    let (p1, p3) = (roots[0], roots[1]);
    let p2 = app.create_posts("borrowck", json!([reply(p1)])).await[0];
    let rest = app
        .create_posts("borrowck", json!([reply(p2), reply(p1), reply(p3)]))
        .await;
    vec![p1, p2, p3, rest[0], rest[1], rest[2]]
}

#[tokio::test]
async fn batch_is_created_in_order_with_one_timestamp() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post(
            "/api/thread/borrowck/create",
            json!([reply(0), { "author": "FERRIS", "message": "second" }]),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts[0]["id"].as_i64() < posts[1]["id"].as_i64());
    assert_eq!(posts[0]["created"], posts[1]["created"]);
    assert_eq!(posts[1]["author"], "ferris");
    assert_eq!(posts[1]["forum"], "rust");
    assert_eq!(posts[1]["parent"], 0);
    assert_eq!(posts[1]["isEdited"], false);
}

#[tokio::test]
async fn empty_batch_and_unknown_thread() {
    let app = TestApp::seeded().await;
    let (status, body) = app.post("/api/thread/borrowck/create", json!([])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!([]));

    let (status, _) = app.post("/api/thread/missing/create", json!([])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejected_batches_persist_nothing() {
    let app = TestApp::seeded().await;
    app.create_thread("rust", "ferris", Some("elsewhere")).await;
    let foreign = app.create_posts("elsewhere", json!([reply(0)])).await[0];

    let (status, _) = app
        .post("/api/thread/borrowck/create", json!([reply(0), reply(foreign)]))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post("/api/thread/borrowck/create", json!([reply(0), reply(424242)]))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(
            "/api/thread/borrowck/create",
            json!([reply(0), { "author": "ghost", "message": "boo" }]),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, posts) = app.get("/api/thread/borrowck/posts").await;
    assert_eq!(posts, json!([]));
}

#[tokio::test]
async fn flat_listing() {
    let app = TestApp::seeded().await;
    let p = forest(&app).await;

    let (status, body) = app.get("/api/thread/borrowck/posts?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), [p[0], p[1], p[2]]);

    let (_, body) = app
        .get(&format!("/api/thread/borrowck/posts?sort=flat&since={}&desc=true", p[2]))
        .await;
    assert_eq!(ids(&body), [p[1], p[0]]);
}

#[tokio::test]
async fn tree_listing() {
    let app = TestApp::seeded().await;
    let p = forest(&app).await;
    let depth_first = vec![p[0], p[1], p[3], p[4], p[2], p[5]];

    let (_, body) = app.get("/api/thread/borrowck/posts?sort=tree").await;
    assert_eq!(ids(&body), depth_first);

    let (_, body) = app.get("/api/thread/borrowck/posts?sort=tree&desc=true").await;
    let mut reversed = depth_first.clone();
    reversed.reverse();
    assert_eq!(ids(&body), reversed);

    let (_, body) = app
        .get(&format!("/api/thread/borrowck/posts?sort=tree&since={}&limit=2", p[3]))
        .await;
    assert_eq!(ids(&body), [p[4], p[2]]);
}

#[tokio::test]
async fn parent_tree_listing() {
    let app = TestApp::seeded().await;
    let p = forest(&app).await;

    let (_, body) = app
        .get("/api/thread/borrowck/posts?sort=parent_tree&limit=1")
        .await;
    assert_eq!(ids(&body), [p[0], p[1], p[3], p[4]]);

    let (_, body) = app
        .get(&format!("/api/thread/borrowck/posts?sort=parent_tree&limit=1&since={}", p[4]))
        .await;
    assert_eq!(ids(&body), [p[2], p[5]]);

    let (_, body) = app
        .get("/api/thread/borrowck/posts?sort=parent_tree&desc=true")
        .await;
    assert_eq!(ids(&body), [p[2], p[5], p[0], p[1], p[3], p[4]]);
}

#[tokio::test]
async fn listing_errors() {
    let app = TestApp::seeded().await;
    let (status, _) = app.get("/api/thread/borrowck/posts?sort=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/thread/missing/posts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn details_with_related_entities() {
    let app = TestApp::seeded().await;
    let id = app.create_posts("borrowck", json!([reply(0)])).await[0];

    let (status, body) = app.get(&format!("/api/post/{id}/details")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["id"], id);
    assert!(body.get("author").is_none());
    assert!(body.get("thread").is_none());

    let (_, body) = app
        .get(&format!("/api/post/{id}/details?related=user,forum,thread"))
        .await;
    assert_eq!(body["author"]["nickname"], "ferris");
    assert_eq!(body["forum"]["slug"], "rust");
    assert_eq!(body["thread"]["slug"], "borrowck");

    let (status, _) = app.get("/api/post/9999/details").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn editing_messages() {
    let app = TestApp::seeded().await;
    let id = app.create_posts("borrowck", json!([reply(0)])).await[0];
    let uri = format!("/api/post/{id}/details");

    let (status, body) = app.post(&uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isEdited"], false);

    let (_, body) = app.post(&uri, json!({ "message": "re: 0" })).await;
    assert_eq!(body["isEdited"], false);

    let (_, body) = app.post(&uri, json!({ "message": "rewritten" })).await;
    assert_eq!(body["isEdited"], true);
    assert_eq!(body["message"], "rewritten");

    let (status, _) = app.post("/api/post/9999/details", json!({ "message": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_naming_its_own_id_as_parent_is_a_conflict() {
    let app = TestApp::seeded().await;

    // Fresh store: the first post gets id 1.
    let (status, body) = app.post("/api/thread/borrowck/create", json!([reply(1)])).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (_, posts) = app.get("/api/thread/borrowck/posts").await;
    assert!(ids(&posts).is_empty());
}
