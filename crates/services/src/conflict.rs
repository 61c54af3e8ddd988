//! # ConflictResolver
//!
//! Idempotent creation of uniquely keyed aggregates without locks. Every
//! create first attempts the insert; the storage primitive's structured
//! violation signal then decides the branch:
//!
//! * applied: the caller created the row (`Creation::Created`)
//! * unique violation: someone else holds the key, fetch and return
//!   their row (`Creation::Conflict`)
//! * foreign-key violation: a referenced row is missing, fail without retry
//!
//! Racing duplicate requests therefore converge on the single row that
//! won the insert.

use std::future::Future;
use std::sync::Arc;

use domains::{
    Creation, DomainError, DomainResult, Forum, ForumRepository, NewForum, NewThread, StoreOutcome,
    Thread, ThreadRef, ThreadRepository, User, UserRepository, Vote, VoteRepository,
};

/// What an insert attempt resolved to, before the caller names the missing reference.
enum Resolved<T> {
    Done(Creation<T>),
    MissingReference,
}

async fn create_or_fetch<T, F, Fut>(
    entity: &'static str,
    key: &str,
    outcome: StoreOutcome<T>,
    fetch_existing: F,
) -> DomainResult<Resolved<T>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<Option<T>>>,
{
    match outcome {
        StoreOutcome::Applied(created) => Ok(Resolved::Done(Creation::Created(created))),
        StoreOutcome::UniqueViolation => {
            tracing::debug!(entity, key, "already exists, returning existing row");
            // Rows are never deleted outside of a global reset, so the holder
            // of the key must be visible now.
            match fetch_existing().await? {
                Some(existing) => Ok(Resolved::Done(Creation::Conflict(existing))),
                None => Err(DomainError::Internal(format!(
                    "{entity} {key} violated a unique key but no holder was found"
                ))),
            }
        }
        StoreOutcome::ForeignKeyViolation => {
            tracing::warn!(entity, key, "insert references a missing row");
            Ok(Resolved::MissingReference)
        }
        StoreOutcome::NotFound => Err(DomainError::Internal(format!(
            "insert of {entity} {key} reported a missing target row"
        ))),
    }
}

pub struct ConflictResolver {
    users: Arc<dyn UserRepository>,
    forums: Arc<dyn ForumRepository>,
    threads: Arc<dyn ThreadRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl ConflictResolver {
    pub fn new(
        users: Arc<dyn UserRepository>,
        forums: Arc<dyn ForumRepository>,
        threads: Arc<dyn ThreadRepository>,
        votes: Arc<dyn VoteRepository>,
    ) -> Self {
        Self {
            users,
            forums,
            threads,
            votes,
        }
    }

    /// Users have two unique keys; a conflict returns every user holding
    /// either the nickname or the email.
    pub async fn create_user(&self, user: &User) -> DomainResult<Creation<User, Vec<User>>> {
        match self.users.insert_user(user).await? {
            StoreOutcome::Applied(created) => Ok(Creation::Created(created)),
            StoreOutcome::UniqueViolation => {
                tracing::debug!(nickname = %user.nickname, "user already exists, returning holders");
                let existing = self
                    .users
                    .find_users_by_nickname_or_email(&user.nickname, &user.email)
                    .await?;
                if existing.is_empty() {
                    return Err(DomainError::Internal(format!(
                        "user {} violated a unique key but no holder was found",
                        user.nickname
                    )));
                }
                Ok(Creation::Conflict(existing))
            }
            other => Err(DomainError::Internal(format!(
                "unexpected outcome inserting user {}: {other:?}",
                user.nickname
            ))),
        }
    }

    pub async fn create_forum(&self, forum: &NewForum) -> DomainResult<Creation<Forum>> {
        let outcome = self.forums.insert_forum(forum).await?;
        let resolved = create_or_fetch("forum", &forum.slug, outcome, || {
            self.forums.find_forum(&forum.slug)
        })
        .await?;
        match resolved {
            Resolved::Done(creation) => Ok(creation),
            Resolved::MissingReference => Err(DomainError::UserUnknown(forum.user.clone())),
        }
    }

    /// Threads are unique by slug only; slug-less threads never conflict.
    pub async fn create_thread(&self, thread: &NewThread) -> DomainResult<Creation<Thread>> {
        let outcome = self.threads.insert_thread(thread).await?;
        let key = thread.slug.clone().unwrap_or_default();
        let resolved = create_or_fetch("thread", &key, outcome, || async {
            match &thread.slug {
                Some(slug) => self.threads.find_thread(&ThreadRef::Slug(slug.clone())).await,
                None => Ok(None),
            }
        })
        .await?;
        match resolved {
            Resolved::Done(creation) => Ok(creation),
            Resolved::MissingReference => {
                // The constraint does not say which reference failed; check the forum.
                match self.forums.find_forum(&thread.forum).await? {
                    None => Err(DomainError::ForumNotFound(thread.forum.clone())),
                    Some(_) => Err(DomainError::UserUnknown(thread.author.clone())),
                }
            }
        }
    }

    /// Insert-or-update on the (thread, user) key. The last committed
    /// value wins; no duplicate rows are ever created.
    pub async fn upsert_vote(&self, vote: &Vote) -> DomainResult<()> {
        match self.votes.insert_vote(vote).await? {
            StoreOutcome::Applied(()) => Ok(()),
            StoreOutcome::UniqueViolation => match self.votes.update_vote(vote).await? {
                StoreOutcome::Applied(()) => Ok(()),
                other => Err(DomainError::Internal(format!(
                    "vote update for thread {} by {} failed: {other:?}",
                    vote.thread_id, vote.nickname
                ))),
            },
            StoreOutcome::ForeignKeyViolation => {
                tracing::warn!(thread_id = vote.thread_id, nickname = %vote.nickname, "vote references a missing row");
                match self.threads.find_thread(&ThreadRef::Id(vote.thread_id)).await? {
                    None => Err(DomainError::ThreadNotFound(vote.thread_id.to_string())),
                    Some(_) => Err(DomainError::UserUnknown(vote.nickname.clone())),
                }
            }
            StoreOutcome::NotFound => Err(DomainError::Internal(format!(
                "vote insert for thread {} reported a missing target row",
                vote.thread_id
            ))),
        }
    }
}
