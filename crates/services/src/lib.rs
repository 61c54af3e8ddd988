//! services
//!
//! Use cases of the discussion engine, written against the `domains`
//! ports only. Writes go through [`ConflictResolver`], post reads through
//! [`PaginationEngine`].

pub mod admin;
pub mod conflict;
pub mod forums;
pub mod pagination;
pub mod posts;
pub mod threads;
pub mod users;

use std::sync::Arc;

use domains::{
    AdminRepository, ForumRepository, PostRepository, ThreadRepository, UserRepository,
    VoteRepository,
};

pub use admin::AdminService;
pub use conflict::ConflictResolver;
pub use forums::ForumService;
pub use pagination::PaginationEngine;
pub use posts::{PostDraft, PostService};
pub use threads::{ThreadDraft, ThreadService};
pub use users::UserService;

/// Every use-case service, wired to one storage backend.
///
/// Cheap to share: hold it in an `Arc` inside the delivery layer's state.
pub struct AggregateService {
    pub users: UserService,
    pub forums: ForumService,
    pub threads: ThreadService,
    pub posts: PostService,
    pub admin: AdminService,
}

impl AggregateService {
    /// Wires all services to a store that implements every port.
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + ForumRepository
            + ThreadRepository
            + VoteRepository
            + PostRepository
            + AdminRepository
            + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let forums: Arc<dyn ForumRepository> = store.clone();
        let threads: Arc<dyn ThreadRepository> = store.clone();
        let votes: Arc<dyn VoteRepository> = store.clone();
        let posts: Arc<dyn PostRepository> = store.clone();
        let admin: Arc<dyn AdminRepository> = store;

        let resolver = Arc::new(ConflictResolver::new(
            users.clone(),
            forums.clone(),
            threads.clone(),
            votes,
        ));

        Self {
            users: UserService::new(users.clone(), resolver.clone()),
            forums: ForumService::new(forums.clone(), resolver.clone()),
            threads: ThreadService::new(threads.clone(), resolver),
            posts: PostService::new(posts, threads, users, forums),
            admin: AdminService::new(admin),
        }
    }
}
