//! Posts: batch creation, paginated reads, joined views and edits.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    DomainError, DomainResult, ForumRepository, FullPost, NewPost, PageRequest, Post,
    PostRepository, Related, ThreadRef, ThreadRepository, UserRepository,
};

use crate::pagination::PaginationEngine;

/// Client input for one post of a batch.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    /// 0 for a root post.
    pub parent: i64,
    pub author: String,
    pub message: String,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    threads: Arc<dyn ThreadRepository>,
    users: Arc<dyn UserRepository>,
    forums: Arc<dyn ForumRepository>,
    pagination: PaginationEngine,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        threads: Arc<dyn ThreadRepository>,
        users: Arc<dyn UserRepository>,
        forums: Arc<dyn ForumRepository>,
    ) -> Self {
        let pagination = PaginationEngine::new(threads.clone(), posts.clone());
        Self {
            posts,
            threads,
            users,
            forums,
            pagination,
        }
    }

    /// Inserts the batch atomically. All posts share one creation timestamp.
    pub async fn create_posts(&self, thread: &ThreadRef, drafts: Vec<PostDraft>) -> DomainResult<Vec<Post>> {
        let thread = self
            .threads
            .find_thread(thread)
            .await?
            .ok_or_else(|| DomainError::ThreadNotFound(thread.to_string()))?;
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let created = Utc::now();
        let batch: Vec<NewPost> = drafts
            .into_iter()
            .map(|draft| NewPost {
                parent: draft.parent,
                author: draft.author,
                message: draft.message,
                created,
            })
            .collect();

        let posts = self.posts.add_posts(&thread, &batch).await?;
        tracing::info!(thread_id = thread.id, forum = %thread.forum, count = posts.len(), "posts created");
        Ok(posts)
    }

    pub async fn posts(&self, thread: &ThreadRef, page: &PageRequest) -> DomainResult<Vec<Post>> {
        self.pagination.page(thread, page).await
    }

    /// Assembles the post and the requested related entities.
    ///
    /// The lookups are independent reads, so a concurrent writer may be
    /// observed part-way through.
    pub async fn details(&self, id: i64, related: Related) -> DomainResult<FullPost> {
        let post = self.find(id).await?;

        let author = if related.user {
            let user = self
                .users
                .find_user(&post.author)
                .await?
                .ok_or_else(|| DomainError::UserUnknown(post.author.clone()))?;
            Some(user)
        } else {
            None
        };

        let thread = if related.thread {
            let thread = self
                .threads
                .find_thread(&ThreadRef::Id(post.thread))
                .await?
                .ok_or_else(|| DomainError::ThreadNotFound(post.thread.to_string()))?;
            Some(thread.masked())
        } else {
            None
        };

        let forum = if related.forum {
            let forum = self
                .forums
                .find_forum(&post.forum)
                .await?
                .ok_or_else(|| DomainError::ForumNotFound(post.forum.clone()))?;
            Some(forum)
        } else {
            None
        };

        Ok(FullPost {
            post,
            author,
            forum,
            thread,
        })
    }

    /// Changes the message. Empty or identical messages leave the post,
    /// including its `is_edited` flag, untouched.
    pub async fn edit(&self, id: i64, message: Option<String>) -> DomainResult<Post> {
        let current = self.find(id).await?;
        let message = match message {
            Some(message) if !message.is_empty() && message != current.message => message,
            _ => return Ok(current),
        };
        let post = self
            .posts
            .update_message(id, &message)
            .await?
            .ok_or(DomainError::PostNotFound(id))?;
        tracing::debug!(post_id = id, "post edited");
        Ok(post)
    }

    async fn find(&self, id: i64) -> DomainResult<Post> {
        self.posts
            .find_post(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }
}
