//! # PaginationEngine
//!
//! Resolves the thread and dispatches a [`PageRequest`] to the post
//! store's traversal for the requested sort mode.

use std::sync::Arc;

use domains::{
    DomainError, DomainResult, PageRequest, Post, PostRepository, SortMode, ThreadRef,
    ThreadRepository,
};

pub struct PaginationEngine {
    threads: Arc<dyn ThreadRepository>,
    posts: Arc<dyn PostRepository>,
}

impl PaginationEngine {
    pub fn new(threads: Arc<dyn ThreadRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { threads, posts }
    }

    /// One page of a thread's posts. An existing thread with nothing past
    /// the cursor yields an empty page, not an error.
    pub async fn page(&self, thread: &ThreadRef, page: &PageRequest) -> DomainResult<Vec<Post>> {
        let thread_id = self
            .threads
            .find_thread(thread)
            .await?
            .map(|t| t.id)
            .ok_or_else(|| DomainError::ThreadNotFound(thread.to_string()))?;

        tracing::debug!(
            thread_id,
            sort = page.sort.as_str(),
            limit = page.limit,
            since = ?page.since,
            desc = page.desc,
            "listing posts"
        );

        match page.sort {
            SortMode::Flat => self.posts.list_flat(thread_id, page).await,
            SortMode::Tree => self.posts.list_tree(thread_id, page).await,
            SortMode::ParentTree => self.posts.list_parent_tree(thread_id, page).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{MockPostRepository, MockThreadRepository, Thread};

    fn thread(id: i64) -> Thread {
        Thread {
            id,
            title: "t".into(),
            author: "a".into(),
            forum: "f".into(),
            message: "m".into(),
            votes: 0,
            slug: "t".into(),
            created: Utc::now(),
        }
    }

    #[tokio::test]
    async fn unknown_thread_fails() {
        let mut threads = MockThreadRepository::new();
        threads.expect_find_thread().returning(|_| Ok(None));
        let engine = PaginationEngine::new(Arc::new(threads), Arc::new(MockPostRepository::new()));

        let err = engine
            .page(&ThreadRef::Slug("ghost".into()), &PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::ThreadNotFound("ghost".into()));
    }

    #[tokio::test]
    async fn dispatches_on_sort_mode() {
        let mut threads = MockThreadRepository::new();
        threads.expect_find_thread().returning(|_| Ok(Some(thread(9))));
        let mut posts = MockPostRepository::new();
        posts.expect_list_flat().never();
        posts.expect_list_tree().never();
        posts
            .expect_list_parent_tree()
            .withf(|thread_id, page| *thread_id == 9 && page.limit == 3 && page.desc)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let engine = PaginationEngine::new(Arc::new(threads), Arc::new(posts));

        let page = PageRequest::new(Some(3), None, true, SortMode::ParentTree);
        let result = engine.page(&ThreadRef::Id(9), &page).await.unwrap();
        assert!(result.is_empty());
    }
}
