use async_trait::async_trait;
use domains::{DomainResult, StoreOutcome, Vote, VoteRepository};

use super::{classify, key, updated, SqliteStore};

#[async_trait]
impl VoteRepository for SqliteStore {
    async fn insert_vote(&self, vote: &Vote) -> DomainResult<StoreOutcome<()>> {
        let result = sqlx::query("INSERT INTO votes (thread_id, voter_key, value) VALUES (?, ?, ?)")
            .bind(vote.thread_id)
            .bind(key(&vote.nickname))
            .bind(vote.value.as_i64())
            .execute(&self.pool)
            .await;
        Ok(classify(result)?.map(|_| ()))
    }

    async fn update_vote(&self, vote: &Vote) -> DomainResult<StoreOutcome<()>> {
        let result = sqlx::query("UPDATE votes SET value = ? WHERE thread_id = ? AND voter_key = ?")
            .bind(vote.value.as_i64())
            .bind(vote.thread_id)
            .bind(key(&vote.nickname))
            .execute(&self.pool)
            .await;
        updated(result)
    }
}
