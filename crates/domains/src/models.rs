//! # Domain Models
//!
//! These structs represent the core entities of the forum: users, forums,
//! threads, hierarchically nested posts, and per-user thread votes.
//! Post and thread ids are monotonic integers assigned by the store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult, ResponseStatus};
use crate::path::PostPath;

/// A registered participant. `nickname` and `email` are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub nickname: String,
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

/// Partial profile update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub fullname: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    /// Builds a patch where empty strings mean "leave unchanged".
    pub fn from_fields(fullname: Option<String>, about: Option<String>, email: Option<String>) -> Self {
        Self {
            fullname: non_empty(fullname),
            about: non_empty(about),
            email: non_empty(email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.about.is_none() && self.email.is_none()
    }
}

/// A discussion forum owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub title: String,
    /// Nickname of the owning user, in its stored casing.
    pub user: String,
    pub slug: String,
    /// Aggregate statistics; initialised to zero and not maintained.
    pub posts: i64,
    pub threads: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewForum {
    pub title: String,
    pub user: String,
    pub slug: String,
}

/// A thread of posts inside a forum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    /// Sum of the current vote values for this thread.
    pub votes: i64,
    pub slug: String,
    pub created: DateTime<Utc>,
}

impl Thread {
    /// Hides the opaque identifier the store assigns to slug-less threads.
    ///
    /// Must be applied to every thread leaving the service layer.
    pub fn masked(mut self) -> Self {
        if is_opaque_slug(&self.slug) {
            self.slug.clear();
        }
        self
    }
}

/// Whether `slug` has the shape of a store-generated identifier.
pub fn is_opaque_slug(slug: &str) -> bool {
    Uuid::parse_str(slug).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThread {
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    /// `None` lets the store assign an opaque identifier.
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
}

/// Partial thread update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadPatch {
    pub title: Option<String>,
    pub message: Option<String>,
}

impl ThreadPatch {
    pub fn from_fields(title: Option<String>, message: Option<String>) -> Self {
        Self {
            title: non_empty(title),
            message: non_empty(message),
        }
    }
}

/// Addresses a thread either by numeric id or by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadRef {
    Id(i64),
    Slug(String),
}

impl ThreadRef {
    /// Strings that parse as integers address by id, everything else by slug.
    pub fn parse(slug_or_id: &str) -> Self {
        match slug_or_id.parse::<i64>() {
            Ok(id) => ThreadRef::Id(id),
            Err(_) => ThreadRef::Slug(slug_or_id.to_string()),
        }
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadRef::Id(id) => write!(f, "{id}"),
            ThreadRef::Slug(slug) => f.write_str(slug),
        }
    }
}

/// A single vote value: exactly -1 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteValue {
    Down,
    Up,
}

impl VoteValue {
    pub fn as_i64(self) -> i64 {
        match self {
            VoteValue::Down => -1,
            VoteValue::Up => 1,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = DomainError;

    fn try_from(voice: i64) -> Result<Self, Self::Error> {
        match voice {
            -1 => Ok(VoteValue::Down),
            1 => Ok(VoteValue::Up),
            other => Err(DomainError::Validation(format!(
                "vote must be -1 or 1, got {other}"
            ))),
        }
    }
}

/// One user's vote on one thread. At most one exists per (thread, user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub thread_id: i64,
    pub nickname: String,
    pub value: VoteValue,
}

/// A single comment within a thread's post tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    /// Parent post id, 0 for root posts.
    pub parent: i64,
    pub author: String,
    pub message: String,
    #[serde(rename = "isEdited")]
    pub is_edited: bool,
    /// Forum of the thread at creation time.
    pub forum: String,
    pub thread: i64,
    pub created: DateTime<Utc>,
    #[serde(skip)]
    pub path: PostPath,
}

/// A post as submitted for insertion; ids, paths and forum are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub parent: i64,
    pub author: String,
    pub message: String,
    pub created: DateTime<Utc>,
}

impl NewPost {
    pub fn parent_id(&self) -> Option<i64> {
        (self.parent != 0).then_some(self.parent)
    }
}

/// Which related entities to join onto a post view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Related {
    pub user: bool,
    pub forum: bool,
    pub thread: bool,
}

impl Related {
    /// Parses a comma separated list such as `user,thread`. Unknown names are ignored.
    pub fn parse(related: &str) -> Self {
        let mut flags = Related::default();
        for name in related.split(',').map(str::trim) {
            match name {
                "user" => flags.user = true,
                "forum" => flags.forum = true,
                "thread" => flags.thread = true,
                _ => {}
            }
        }
        flags
    }
}

/// A post joined with the entities requested through [`Related`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullPost {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

/// Row counts across the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub user: i64,
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
}

/// Result of a create-or-fetch operation. Both variants are successes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Creation<T, C = T> {
    /// The entity was inserted by this call.
    Created(T),
    /// The entity already existed; carries the pre-existing record(s).
    Conflict(C),
}

impl<T, C> Creation<T, C> {
    pub fn status(&self) -> ResponseStatus {
        match self {
            Creation::Created(_) => ResponseStatus::Created,
            Creation::Conflict(_) => ResponseStatus::Conflict,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Creation::Created(_))
    }
}

impl<T> Creation<T> {
    pub fn into_inner(self) -> T {
        match self {
            Creation::Created(entity) | Creation::Conflict(entity) => entity,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Creation<U> {
        match self {
            Creation::Created(entity) => Creation::Created(f(entity)),
            Creation::Conflict(entity) => Creation::Conflict(f(entity)),
        }
    }
}

/// Structured signal a storage primitive returns for a single write.
///
/// Constraint violations are outcomes, not errors: the services branch on
/// them. Anything else the store cannot handle is `Err(DomainError::Internal)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome<T> {
    Applied(T),
    /// A unique key (slug, nickname, email, vote pair) is already taken.
    UniqueViolation,
    /// A referenced row (owner, author, forum, thread) does not exist.
    ForeignKeyViolation,
    /// The row targeted by an update does not exist.
    NotFound,
}

impl<T> StoreOutcome<T> {
    /// Convenience for tests and callers that expect the write to apply.
    pub fn applied(self) -> DomainResult<T> {
        match self {
            StoreOutcome::Applied(value) => Ok(value),
            StoreOutcome::UniqueViolation => Err(DomainError::Internal("unexpected unique violation".into())),
            StoreOutcome::ForeignKeyViolation => {
                Err(DomainError::Internal("unexpected foreign key violation".into()))
            }
            StoreOutcome::NotFound => Err(DomainError::Internal("row to update not found".into())),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StoreOutcome<U> {
        match self {
            StoreOutcome::Applied(value) => StoreOutcome::Applied(f(value)),
            StoreOutcome::UniqueViolation => StoreOutcome::UniqueViolation,
            StoreOutcome::ForeignKeyViolation => StoreOutcome::ForeignKeyViolation,
            StoreOutcome::NotFound => StoreOutcome::NotFound,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread_with_slug(slug: &str) -> Thread {
        Thread {
            id: 1,
            title: "t".into(),
            author: "a".into(),
            forum: "f".into(),
            message: "m".into(),
            votes: 0,
            slug: slug.into(),
            created: Utc::now(),
        }
    }

    #[test]
    fn opaque_slugs_are_masked() {
        let thread = thread_with_slug(&Uuid::new_v4().to_string()).masked();
        assert_eq!(thread.slug, "");
        let thread = thread_with_slug("rust-news").masked();
        assert_eq!(thread.slug, "rust-news");
    }

    #[test]
    fn thread_ref_parsing() {
        assert_eq!(ThreadRef::parse("42"), ThreadRef::Id(42));
        assert_eq!(ThreadRef::parse("x42"), ThreadRef::Slug("x42".into()));
    }

    #[test]
    fn vote_values_are_exactly_one() {
        assert_eq!(VoteValue::try_from(1).unwrap(), VoteValue::Up);
        assert_eq!(VoteValue::try_from(-1).unwrap().as_i64(), -1);
        assert!(matches!(VoteValue::try_from(2), Err(DomainError::Validation(_))));
        assert!(matches!(VoteValue::try_from(0), Err(DomainError::Validation(_))));
    }

    #[test]
    fn related_flags() {
        let related = Related::parse("user,thread");
        assert!(related.user && related.thread && !related.forum);
        assert_eq!(Related::parse(""), Related::default());
    }

    #[test]
    fn patches_treat_empty_as_unchanged() {
        let patch = UserPatch::from_fields(Some(String::new()), None, Some("a@b.c".into()));
        assert_eq!(patch.fullname, None);
        assert_eq!(patch.email.as_deref(), Some("a@b.c"));
        assert!(UserPatch::from_fields(Some(String::new()), None, None).is_empty());
    }

    #[test]
    fn post_serializes_edited_flag_in_camel_case() {
        let post = Post {
            id: 3,
            parent: 0,
            author: "a".into(),
            message: "m".into(),
            is_edited: false,
            forum: "f".into(),
            thread: 1,
            created: Utc::now(),
            path: PostPath::root(3),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["isEdited"], serde_json::json!(false));
        assert!(json.get("path").is_none());
    }
}
