//! Racing writers through the service layer against one on-disk store
//! shared by several pooled connections.

use std::sync::Arc;

use domains::{Creation, NewForum, User};
use integration_tests::serde_json::json;
use integration_tests::{file_store, TestApp};
use services::AggregateService;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_forum_creates_converge_on_one_row() {
    let (_dir, store) = file_store().await;
    let service = Arc::new(AggregateService::new(Arc::new(store)));
    service
        .users
        .create(User {
            nickname: "ferris".into(),
            fullname: "Ferris".into(),
            about: String::new(),
            email: "ferris@forum.test".into(),
        })
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            service
                .forums
                .create(NewForum {
                    title: format!("attempt {i}"),
                    user: "ferris".into(),
                    slug: if i % 2 == 0 { "race" } else { "RACE" }.into(),
                })
                .await
        }));
    }

    let mut created = 0;
    let mut titles = Vec::new();
    for task in tasks {
        match task.await.unwrap().unwrap() {
            Creation::Created(forum) => {
                created += 1;
                titles.push(forum.title);
            }
            Creation::Conflict(forum) => titles.push(forum.title),
        }
    }
    assert_eq!(created, 1);
    titles.dedup();
    assert_eq!(titles.len(), 1, "every caller must see the winning row");
    assert_eq!(service.admin.status().await.unwrap().forum, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_votes_leave_one_vote_per_user() {
    let (_dir, store) = file_store().await;
    let app = TestApp::with_store(store.clone());
    app.seed().await;
    app.create_user("crab").await;

    let mut tasks = Vec::new();
    for round in 0..4 {
        for (nickname, voice) in [("ferris", 1), ("crab", -1), ("ferris", -1), ("crab", 1)] {
            let app = app.clone();
            let voice = if round % 2 == 0 { voice } else { -voice };
            tasks.push(tokio::spawn(async move {
                app.post(
                    "/api/thread/borrowck/vote",
                    json!({ "nickname": nickname, "voice": voice }),
                )
                .await
            }));
        }
    }
    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert!(status.is_success(), "{status}: {body}");
    }

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 2);

    let (_, thread) = app.get("/api/thread/borrowck/details").await;
    let votes = thread["votes"].as_i64().unwrap();
    assert!([-2, 0, 2].contains(&votes), "tally {votes} is not a sum of one vote per user");
}
