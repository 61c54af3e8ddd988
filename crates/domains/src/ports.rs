//! # Ports
//!
//! Any storage adapter must implement these traits to back the services.
//! The underlying primitive is expected to provide atomic transactions,
//! unique/foreign-key violation signalling and ordered range scans.
//!
//! Writes that can hit a constraint return [`StoreOutcome`] so callers can
//! branch on the violation instead of parsing error strings.

use async_trait::async_trait;

use crate::errors::DomainResult;
use crate::models::{
    Forum, NewForum, NewPost, NewThread, Post, StoreOutcome, StoreStatus, Thread, ThreadPatch,
    ThreadRef, User, UserPatch, Vote,
};
use crate::paging::{PageRequest, ThreadListing, UserListing};

/// Persistence contract for users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> DomainResult<StoreOutcome<User>>;
    async fn find_user(&self, nickname: &str) -> DomainResult<Option<User>>;
    /// Every user whose nickname or email equals the given ones, ignoring case.
    async fn find_users_by_nickname_or_email(&self, nickname: &str, email: &str) -> DomainResult<Vec<User>>;
    async fn update_user(&self, nickname: &str, patch: &UserPatch) -> DomainResult<StoreOutcome<User>>;
}

/// Persistence contract for forums and forum-scoped listings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumRepository: Send + Sync {
    async fn insert_forum(&self, forum: &NewForum) -> DomainResult<StoreOutcome<Forum>>;
    async fn find_forum(&self, slug: &str) -> DomainResult<Option<Forum>>;
    async fn list_threads(&self, slug: &str, listing: &ThreadListing) -> DomainResult<Vec<Thread>>;
    /// Distinct authors of threads or posts in the forum.
    async fn list_users(&self, slug: &str, listing: &UserListing) -> DomainResult<Vec<User>>;
}

/// Persistence contract for threads.
///
/// Returned threads carry their raw stored slug; masking opaque slugs is
/// the caller's job.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// When `thread.slug` is `None` the store assigns an opaque UUID-shaped slug.
    async fn insert_thread(&self, thread: &NewThread) -> DomainResult<StoreOutcome<Thread>>;
    async fn find_thread(&self, thread: &ThreadRef) -> DomainResult<Option<Thread>>;
    async fn update_thread(&self, id: i64, patch: &ThreadPatch) -> DomainResult<Option<Thread>>;
}

/// Persistence contract for votes keyed by (thread, user).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn insert_vote(&self, vote: &Vote) -> DomainResult<StoreOutcome<()>>;
    async fn update_vote(&self, vote: &Vote) -> DomainResult<StoreOutcome<()>>;
}

/// Post storage: atomic batch insertion and the three paginated traversals.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts the whole batch in one transaction or nothing.
    ///
    /// Fails with `ParentNotFound` when a declared parent is not committed
    /// in `thread`, and `UserUnknown` when an author does not exist.
    async fn add_posts(&self, thread: &Thread, posts: &[NewPost]) -> DomainResult<Vec<Post>>;
    async fn find_post(&self, id: i64) -> DomainResult<Option<Post>>;
    /// Unconditionally sets the message and marks the post edited.
    async fn update_message(&self, id: i64, message: &str) -> DomainResult<Option<Post>>;
    async fn list_flat(&self, thread_id: i64, page: &PageRequest) -> DomainResult<Vec<Post>>;
    async fn list_tree(&self, thread_id: i64, page: &PageRequest) -> DomainResult<Vec<Post>>;
    async fn list_parent_tree(&self, thread_id: i64, page: &PageRequest) -> DomainResult<Vec<Post>>;
}

/// Whole-store maintenance.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn status(&self) -> DomainResult<StoreStatus>;
    /// Removes every row of every collection in one transaction.
    async fn clear(&self) -> DomainResult<()>;
}
