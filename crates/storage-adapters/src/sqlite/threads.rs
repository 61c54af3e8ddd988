use async_trait::async_trait;
use domains::{DomainError, DomainResult, NewThread, StoreOutcome, Thread, ThreadPatch, ThreadRef, ThreadRepository};
use uuid::Uuid;

use super::rows::{ThreadRow, THREAD_SELECT};
use super::{classify, encode_time, internal, key, updated, SqliteStore};

#[async_trait]
impl ThreadRepository for SqliteStore {
    async fn insert_thread(&self, thread: &NewThread) -> DomainResult<StoreOutcome<Thread>> {
        let slug = thread
            .slug
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let result = sqlx::query_scalar::<_, i64>(
            "INSERT INTO threads (title, author_key, forum_key, message, slug, slug_key, created) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&thread.title)
        .bind(key(&thread.author))
        .bind(key(&thread.forum))
        .bind(&thread.message)
        .bind(&slug)
        .bind(key(&slug))
        .bind(encode_time(thread.created))
        .fetch_one(&self.pool)
        .await;

        match classify(result)? {
            StoreOutcome::Applied(id) => {
                let stored = self
                    .find_thread(&ThreadRef::Id(id))
                    .await?
                    .ok_or_else(|| DomainError::Internal(format!("thread {id} vanished after insert")))?;
                Ok(StoreOutcome::Applied(stored))
            }
            StoreOutcome::UniqueViolation => Ok(StoreOutcome::UniqueViolation),
            StoreOutcome::ForeignKeyViolation => Ok(StoreOutcome::ForeignKeyViolation),
            StoreOutcome::NotFound => Ok(StoreOutcome::NotFound),
        }
    }

    async fn find_thread(&self, thread: &ThreadRef) -> DomainResult<Option<Thread>> {
        let row: Option<ThreadRow> = match thread {
            ThreadRef::Id(id) => {
                sqlx::query_as(&format!("{THREAD_SELECT} WHERE t.id = ?"))
                    .bind(*id)
                    .fetch_optional(&self.pool)
                    .await
            }
            ThreadRef::Slug(slug) => {
                sqlx::query_as(&format!("{THREAD_SELECT} WHERE t.slug_key = ?"))
                    .bind(key(slug))
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(internal)?;
        row.map(ThreadRow::into_thread).transpose()
    }

    async fn update_thread(&self, id: i64, patch: &ThreadPatch) -> DomainResult<Option<Thread>> {
        let result = sqlx::query(
            "UPDATE threads SET title = COALESCE(?, title), message = COALESCE(?, message) WHERE id = ?",
        )
        .bind(patch.title.as_deref())
        .bind(patch.message.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await;

        match updated(result)? {
            StoreOutcome::Applied(()) => self.find_thread(&ThreadRef::Id(id)).await,
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::is_opaque_slug;

    use crate::sqlite::test_support::{seed_forum, seed_thread, seeded, store};

    #[tokio::test]
    async fn slugless_thread_gets_an_opaque_slug() {
        let (store, _) = seeded().await;
        let thread = seed_thread(&store, "rust", "ferris", None).await;
        assert!(is_opaque_slug(&thread.slug));
        assert_eq!(thread.clone().masked().slug, "");

        let by_id = store.find_thread(&ThreadRef::Id(thread.id)).await.unwrap().unwrap();
        assert_eq!(by_id.slug, thread.slug);
    }

    #[tokio::test]
    async fn lookup_by_slug_ignores_case() {
        let (store, thread) = seeded().await;
        let found = store
            .find_thread(&ThreadRef::Slug("BorrowCK".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, thread.id);
        assert_eq!(found.slug, "borrowck");
        assert_eq!(found.votes, 0);
    }

    #[tokio::test]
    async fn constraint_signals() {
        let (store, _) = seeded().await;
        let duplicate = NewThread {
            title: "again".into(),
            author: "ferris".into(),
            forum: "rust".into(),
            message: "m".into(),
            slug: Some("BORROWCK".into()),
            created: Utc::now(),
        };
        assert_eq!(store.insert_thread(&duplicate).await.unwrap(), StoreOutcome::UniqueViolation);

        let unknown_forum = NewThread {
            slug: None,
            forum: "go".into(),
            ..duplicate
        };
        assert_eq!(
            store.insert_thread(&unknown_forum).await.unwrap(),
            StoreOutcome::ForeignKeyViolation
        );
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let (store, thread) = seeded().await;
        let patch = ThreadPatch::from_fields(None, Some("edited".into()));
        let updated = store.update_thread(thread.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.title, thread.title);
        assert_eq!(updated.message, "edited");

        assert_eq!(store.update_thread(9999, &patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn created_time_round_trips() {
        let store = store().await;
        crate::sqlite::test_support::seed_user(&store, "ferris").await;
        seed_forum(&store, "rust", "ferris").await;
        let created = Utc::now();
        let thread = store
            .insert_thread(&NewThread {
                title: "t".into(),
                author: "ferris".into(),
                forum: "rust".into(),
                message: "m".into(),
                slug: Some("t".into()),
                created,
            })
            .await
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(thread.created.timestamp_micros(), created.timestamp_micros());
    }
}
