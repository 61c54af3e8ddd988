//! Cursor pagination parameters for post, thread and user listings.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Page size used when the caller gives none (or a non-positive one).
pub const DEFAULT_LIMIT: u32 = 100;

/// Traversal order over a thread's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Insertion (id) order.
    #[default]
    Flat,
    /// Depth-first order by materialized path.
    Tree,
    /// `limit` root posts by id, each followed by its whole subtree.
    ParentTree,
}

impl FromStr for SortMode {
    type Err = DomainError;

    fn from_str(sort: &str) -> Result<Self, Self::Err> {
        match sort {
            "" | "flat" => Ok(SortMode::Flat),
            "tree" => Ok(SortMode::Tree),
            "parent_tree" => Ok(SortMode::ParentTree),
            other => Err(DomainError::Validation(format!("unknown sort mode: {other}"))),
        }
    }
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Flat => "flat",
            SortMode::Tree => "tree",
            SortMode::ParentTree => "parent_tree",
        }
    }
}

fn normalize_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(limit) if limit > 0 => u32::try_from(limit).unwrap_or(u32::MAX),
        _ => DEFAULT_LIMIT,
    }
}

/// A normalized request for one page of a thread's posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    /// Exclusive cursor: a post id. For `ParentTree` it is resolved to its root.
    pub since: Option<i64>,
    pub desc: bool,
    pub sort: SortMode,
}

impl PageRequest {
    /// `since == 0` means "no cursor", mirroring absent query parameters.
    pub fn new(limit: Option<i64>, since: Option<i64>, desc: bool, sort: SortMode) -> Self {
        Self {
            limit: normalize_limit(limit),
            since: since.filter(|s| *s != 0),
            desc,
            sort,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, false, SortMode::Flat)
    }
}

/// Listing of a forum's threads ordered by creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadListing {
    pub limit: u32,
    /// Inclusive bound on `created`.
    pub since: Option<DateTime<Utc>>,
    pub desc: bool,
}

impl ThreadListing {
    pub fn new(limit: Option<i64>, since: Option<DateTime<Utc>>, desc: bool) -> Self {
        Self {
            limit: normalize_limit(limit),
            since,
            desc,
        }
    }
}

/// Listing of a forum's participants ordered by case-folded nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListing {
    pub limit: u32,
    /// Exclusive bound on the nickname, compared ignoring case.
    pub since: Option<String>,
    pub desc: bool,
}

impl UserListing {
    pub fn new(limit: Option<i64>, since: Option<String>, desc: bool) -> Self {
        Self {
            limit: normalize_limit(limit),
            since: since.filter(|s| !s.is_empty()),
            desc,
        }
    }
}
