use axum::http::StatusCode;
use integration_tests::serde_json::json;
use integration_tests::TestApp;

#[tokio::test]
async fn create_then_fetch_profile() {
    let app = TestApp::spawn().await;
    let created = app.create_user("Ferris").await;
    assert_eq!(created["nickname"], "Ferris");

    let (status, body) = app.get("/api/user/ferris/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], "Ferris");
    assert_eq!(body["email"], "Ferris@forum.test");
}

#[tokio::test]
async fn duplicate_returns_every_conflicting_user() {
    let app = TestApp::spawn().await;
    app.create_user("alice").await;
    app.create_user("bob").await;

    let (status, body) = app
        .post(
            "/api/user/ALICE/create",
            json!({ "fullname": "x", "about": "", "email": "BOB@forum.test" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["nickname"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["alice", "bob"]);
}

#[tokio::test]
async fn profile_update_is_partial() {
    let app = TestApp::spawn().await;
    app.create_user("alice").await;

    let (status, body) = app
        .post("/api/user/alice/profile", json!({ "about": "Down the rabbit hole" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["about"], "Down the rabbit hole");
    assert_eq!(body["fullname"], "alice Full");

    let (status, body) = app.post("/api/user/alice/profile", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["about"], "Down the rabbit hole");
}

#[tokio::test]
async fn profile_errors() {
    let app = TestApp::spawn().await;
    app.create_user("alice").await;
    app.create_user("bob").await;

    let (status, body) = app.get("/api/user/nobody/profile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, _) = app
        .post("/api/user/nobody/profile", json!({ "fullname": "Nobody" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/api/user/alice/profile", json!({ "email": "bob@forum.test" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
