//! Threads: creation, lookup, edits and voting.
//!
//! Every thread returned from here has passed through [`Thread::masked`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    Creation, DomainError, DomainResult, NewThread, Thread, ThreadPatch, ThreadRef,
    ThreadRepository, Vote, VoteValue,
};

use crate::conflict::ConflictResolver;

/// Client input for a new thread; the forum comes from the route.
#[derive(Debug, Clone, Default)]
pub struct ThreadDraft {
    pub title: String,
    pub author: String,
    pub message: String,
    pub slug: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

pub struct ThreadService {
    threads: Arc<dyn ThreadRepository>,
    resolver: Arc<ConflictResolver>,
}

impl ThreadService {
    pub fn new(threads: Arc<dyn ThreadRepository>, resolver: Arc<ConflictResolver>) -> Self {
        Self { threads, resolver }
    }

    pub async fn create(&self, forum: &str, draft: ThreadDraft) -> DomainResult<Creation<Thread>> {
        let thread = NewThread {
            title: draft.title,
            author: draft.author,
            forum: forum.to_string(),
            message: draft.message,
            slug: draft.slug.filter(|s| !s.is_empty()),
            created: draft.created.unwrap_or_else(Utc::now),
        };
        let creation = self.resolver.create_thread(&thread).await?;
        if let Creation::Created(created) = &creation {
            tracing::info!(thread_id = created.id, forum = %created.forum, "thread created");
        }
        Ok(creation.map(Thread::masked))
    }

    pub async fn details(&self, thread: &ThreadRef) -> DomainResult<Thread> {
        self.find(thread).await.map(Thread::masked)
    }

    /// Non-empty fields replace the stored ones; an empty patch is a read.
    pub async fn update(&self, thread: &ThreadRef, patch: ThreadPatch) -> DomainResult<Thread> {
        let current = self.find(thread).await?;
        if patch == ThreadPatch::default() {
            return Ok(current.masked());
        }
        self.threads
            .update_thread(current.id, &patch)
            .await?
            .map(Thread::masked)
            .ok_or_else(|| DomainError::ThreadNotFound(thread.to_string()))
    }

    /// Records `voice` for `nickname` and returns the thread with its fresh tally.
    pub async fn vote(&self, thread: &ThreadRef, nickname: &str, voice: i64) -> DomainResult<Thread> {
        let value = VoteValue::try_from(voice)?;
        let current = self.find(thread).await?;
        let vote = Vote {
            thread_id: current.id,
            nickname: nickname.to_string(),
            value,
        };
        self.resolver.upsert_vote(&vote).await?;
        tracing::debug!(thread_id = current.id, nickname, voice, "vote recorded");
        self.details(&ThreadRef::Id(current.id)).await
    }

    async fn find(&self, thread: &ThreadRef) -> DomainResult<Thread> {
        self.threads
            .find_thread(thread)
            .await?
            .ok_or_else(|| DomainError::ThreadNotFound(thread.to_string()))
    }
}
