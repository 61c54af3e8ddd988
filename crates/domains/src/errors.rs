//! # DomainError
//!
//! Centralized error handling for the forum engine.
//! Maps storage and validation failures to the kinds the delivery layer
//! understands. Duplicate-creation conflicts are *not* errors; they are
//! reported through [`crate::Creation::Conflict`].

use thiserror::Error;

/// Transport-agnostic classification of an operation result.
///
/// The delivery layer maps these onto HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Created,
    Ok,
    Conflict,
    NotFound,
    BadRequest,
    Internal,
}

/// The primary error type for all forum operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A post in a batch references a parent that is not committed in the same thread.
    #[error("parent post was created in another thread or does not exist")]
    ParentNotFound,

    #[error("can't find thread by slug or id: {0}")]
    ThreadNotFound(String),

    #[error("can't find forum with slug: {0}")]
    ForumNotFound(String),

    #[error("can't find post with id: {0}")]
    PostNotFound(i64),

    /// A referenced user (author, owner, voter) does not exist.
    #[error("can't find user with nickname: {0}")]
    UserUnknown(String),

    /// Malformed input (e.g. a vote that is neither -1 nor +1)
    #[error("validation error: {0}")]
    Validation(String),

    /// A non-creation update collided with another row's unique key
    /// (e.g. a profile update to an email that is already taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (connectivity, unexpected constraint failures)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn status(&self) -> ResponseStatus {
        match self {
            DomainError::ThreadNotFound(_)
            | DomainError::ForumNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::UserUnknown(_) => ResponseStatus::NotFound,
            DomainError::ParentNotFound | DomainError::Conflict(_) => ResponseStatus::Conflict,
            DomainError::Validation(_) => ResponseStatus::BadRequest,
            DomainError::Internal(_) => ResponseStatus::Internal,
        }
    }
}

/// A specialized Result type for forum logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
