use async_trait::async_trait;
use domains::{AdminRepository, DomainResult, StoreStatus};

use super::{internal, SqliteStore};

#[derive(sqlx::FromRow)]
struct CountsRow {
    users: i64,
    forums: i64,
    threads: i64,
    posts: i64,
}

#[async_trait]
impl AdminRepository for SqliteStore {
    async fn status(&self) -> DomainResult<StoreStatus> {
        let counts: CountsRow = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM users) AS users, \
                    (SELECT COUNT(*) FROM forums) AS forums, \
                    (SELECT COUNT(*) FROM threads) AS threads, \
                    (SELECT COUNT(*) FROM posts) AS posts",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(internal)?;

        Ok(StoreStatus {
            user: counts.users,
            forum: counts.forums,
            thread: counts.threads,
            post: counts.posts,
        })
    }

    async fn clear(&self) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(internal)?;
        // Children first so foreign keys never dangle mid-transaction.
        for table in ["votes", "posts", "threads", "forums", "users"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(internal)?;
        }
        tx.commit().await.map_err(internal)?;
        Ok(())
    }
}
