//! Forums and forum-scoped listings.

use std::sync::Arc;

use domains::{
    Creation, DomainError, DomainResult, Forum, ForumRepository, NewForum, Thread, ThreadListing,
    User, UserListing,
};

use crate::conflict::ConflictResolver;

pub struct ForumService {
    forums: Arc<dyn ForumRepository>,
    resolver: Arc<ConflictResolver>,
}

impl ForumService {
    pub fn new(forums: Arc<dyn ForumRepository>, resolver: Arc<ConflictResolver>) -> Self {
        Self { forums, resolver }
    }

    pub async fn create(&self, forum: NewForum) -> DomainResult<Creation<Forum>> {
        if forum.slug.is_empty() {
            return Err(DomainError::Validation("forum slug must not be empty".into()));
        }
        let creation = self.resolver.create_forum(&forum).await?;
        if creation.is_created() {
            tracing::info!(forum = %forum.slug, owner = %forum.user, "forum created");
        }
        Ok(creation)
    }

    pub async fn details(&self, slug: &str) -> DomainResult<Forum> {
        self.forums
            .find_forum(slug)
            .await?
            .ok_or_else(|| DomainError::ForumNotFound(slug.to_string()))
    }

    pub async fn threads(&self, slug: &str, listing: &ThreadListing) -> DomainResult<Vec<Thread>> {
        let threads = self.forums.list_threads(slug, listing).await?;
        if threads.is_empty() {
            self.details(slug).await?;
        }
        Ok(threads.into_iter().map(Thread::masked).collect())
    }

    pub async fn users(&self, slug: &str, listing: &UserListing) -> DomainResult<Vec<User>> {
        let users = self.forums.list_users(slug, listing).await?;
        if users.is_empty() {
            self.details(slug).await?;
        }
        Ok(users)
    }
}
