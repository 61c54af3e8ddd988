use async_trait::async_trait;
use domains::{
    DomainError, DomainResult, Forum, ForumRepository, NewForum, StoreOutcome, Thread, ThreadListing,
    User, UserListing,
};
use sqlx::{QueryBuilder, Sqlite};

use super::rows::{into_threads, ForumRow, ThreadRow, UserRow, FORUM_SELECT, THREAD_SELECT, USER_COLUMNS};
use super::{classify, encode_time, internal, key, SqliteStore};

#[async_trait]
impl ForumRepository for SqliteStore {
    async fn insert_forum(&self, forum: &NewForum) -> DomainResult<StoreOutcome<Forum>> {
        let result = sqlx::query("INSERT INTO forums (slug_key, slug, title, owner_key) VALUES (?, ?, ?, ?)")
            .bind(key(&forum.slug))
            .bind(&forum.slug)
            .bind(&forum.title)
            .bind(key(&forum.user))
            .execute(&self.pool)
            .await;

        match classify(result)? {
            StoreOutcome::Applied(_) => {
                // Re-read so the owner comes back in its stored casing.
                let stored = self.find_forum(&forum.slug).await?.ok_or_else(|| {
                    DomainError::Internal(format!("forum {} vanished after insert", forum.slug))
                })?;
                Ok(StoreOutcome::Applied(stored))
            }
            StoreOutcome::UniqueViolation => Ok(StoreOutcome::UniqueViolation),
            StoreOutcome::ForeignKeyViolation => Ok(StoreOutcome::ForeignKeyViolation),
            StoreOutcome::NotFound => Ok(StoreOutcome::NotFound),
        }
    }

    async fn find_forum(&self, slug: &str) -> DomainResult<Option<Forum>> {
        let row: Option<ForumRow> = sqlx::query_as(&format!("{FORUM_SELECT} WHERE f.slug_key = ?"))
            .bind(key(slug))
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(Forum::from))
    }

    async fn list_threads(&self, slug: &str, listing: &ThreadListing) -> DomainResult<Vec<Thread>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(THREAD_SELECT);
        query.push(" WHERE t.forum_key = ").push_bind(key(slug));
        if let Some(since) = listing.since {
            query
                .push(if listing.desc { " AND t.created <= " } else { " AND t.created >= " })
                .push_bind(encode_time(since));
        }
        query
            .push(if listing.desc {
                " ORDER BY t.created DESC, t.id DESC"
            } else {
                " ORDER BY t.created ASC, t.id ASC"
            })
            .push(" LIMIT ")
            .push_bind(i64::from(listing.limit));

        let rows: Vec<ThreadRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        into_threads(rows)
    }

    async fn list_users(&self, slug: &str, listing: &UserListing) -> DomainResult<Vec<User>> {
        let forum_key = key(slug);
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(USER_COLUMNS);
        query
            .push(" WHERE u.nickname_key IN (SELECT author_key FROM threads WHERE forum_key = ")
            .push_bind(forum_key.clone())
            .push(" UNION SELECT author_key FROM posts WHERE forum_key = ")
            .push_bind(forum_key)
            .push(")");
        if let Some(since) = &listing.since {
            query
                .push(if listing.desc { " AND u.nickname_key < " } else { " AND u.nickname_key > " })
                .push_bind(key(since));
        }
        query
            .push(if listing.desc {
                " ORDER BY u.nickname_key DESC"
            } else {
                " ORDER BY u.nickname_key ASC"
            })
            .push(" LIMIT ")
            .push_bind(i64::from(listing.limit));

        let rows: Vec<UserRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
