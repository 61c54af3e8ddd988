//! # PathIndex
//!
//! Resolves a declared parent to its materialized path inside the thread
//! being written to. Lookups run on the batch's own transaction but skip
//! ids inserted earlier in the same batch: a post can only hang off a
//! parent that was committed before the batch began.

use std::collections::HashSet;

use domains::{DomainResult, ParentLookup, PostPath};
use sqlx::SqliteConnection;

use super::internal;

#[derive(Debug, Default)]
pub(crate) struct PathIndex {
    batch: HashSet<i64>,
}

impl PathIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lookup(
        &self,
        conn: &mut SqliteConnection,
        thread_id: i64,
        parent: Option<i64>,
    ) -> DomainResult<ParentLookup> {
        let Some(parent) = parent else {
            return Ok(ParentLookup::Root);
        };
        if self.batch.contains(&parent) {
            return Ok(ParentLookup::Missing);
        }

        let path_key: Option<String> =
            sqlx::query_scalar("SELECT path_key FROM posts WHERE id = ? AND thread_id = ?")
                .bind(parent)
                .bind(thread_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(internal)?;

        match path_key {
            Some(path_key) => Ok(ParentLookup::Found(PostPath::from_sort_key(&path_key)?)),
            None => Ok(ParentLookup::Missing),
        }
    }

    /// Marks `id` as written by the current batch.
    pub(crate) fn record(&mut self, id: i64) {
        self.batch.insert(id);
    }
}
