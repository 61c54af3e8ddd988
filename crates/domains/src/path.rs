//! # Materialized post paths
//!
//! Every post carries the ids of its ancestors followed by its own id.
//! Ordering paths lexicographically (numerically per segment) yields the
//! depth-first order of the thread's post tree, so no recursive traversal
//! is needed at read time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Width of one hex-encoded segment in a [`PostPath::sort_key`].
const SEGMENT_WIDTH: usize = 16;
const SEGMENT_SEPARATOR: char = '.';

/// Ancestor chain of a post, terminating in the post's own id.
///
/// Invariants: never empty, every segment is a positive post id, and
/// `path(child) == path(parent) ++ [child.id]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostPath(Vec<i64>);

/// Result of looking up a declared parent inside the target thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLookup {
    /// The post declares no parent (parent id 0 or absent).
    Root,
    /// The parent is committed in the same thread.
    Found(PostPath),
    /// The parent is absent, lives in another thread, or is not committed yet.
    Missing,
}

impl PostPath {
    pub fn root(id: i64) -> Self {
        Self(vec![id])
    }

    pub fn child(&self, id: i64) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(id);
        Self(segments)
    }

    /// Computes the tree position of a freshly allocated post id.
    pub fn assign(parent: ParentLookup, new_id: i64) -> DomainResult<Self> {
        match parent {
            ParentLookup::Root => Ok(Self::root(new_id)),
            ParentLookup::Found(parent_path) => Ok(parent_path.child(new_id)),
            ParentLookup::Missing => Err(DomainError::ParentNotFound),
        }
    }

    pub fn segments(&self) -> &[i64] {
        &self.0
    }

    /// Id of the root post of the subtree this path belongs to.
    pub fn root_id(&self) -> i64 {
        self.0[0]
    }

    /// Id of the post owning this path.
    pub fn post_id(&self) -> i64 {
        self.0[self.0.len() - 1]
    }

    pub fn parent_id(&self) -> Option<i64> {
        self.0.len().checked_sub(2).map(|i| self.0[i])
    }

    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    pub fn is_ancestor_of(&self, other: &PostPath) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    /// Byte-comparable encoding: fixed-width hex segments joined by `.`.
    ///
    /// For any two paths `a < b` iff `a.sort_key() < b.sort_key()`, which
    /// lets a storage primitive with plain ordered string scans serve tree
    /// order without native array support.
    pub fn sort_key(&self) -> String {
        let mut key = String::with_capacity(self.0.len() * (SEGMENT_WIDTH + 1));
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                key.push(SEGMENT_SEPARATOR);
            }
            key.push_str(&format!("{:0width$x}", id, width = SEGMENT_WIDTH));
        }
        key
    }

    pub fn from_sort_key(key: &str) -> DomainResult<Self> {
        key.parse()
    }
}

impl FromStr for PostPath {
    type Err = DomainError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::Internal(format!("malformed post path key: {key:?}"));
        let segments = key
            .split(SEGMENT_SEPARATOR)
            .map(|segment| {
                if segment.len() != SEGMENT_WIDTH {
                    return Err(malformed());
                }
                match i64::from_str_radix(segment, 16) {
                    Ok(id) if id > 0 => Ok(id),
                    _ => Err(malformed()),
                }
            })
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self(segments))
    }
}

impl fmt::Display for PostPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.0.iter().map(i64::to_string).collect();
        write!(f, "[{}]", ids.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_child_paths() {
        let root = PostPath::assign(ParentLookup::Root, 4).unwrap();
        assert_eq!(root.segments(), &[4]);
        let child = PostPath::assign(ParentLookup::Found(root.clone()), 9).unwrap();
        assert_eq!(child.segments(), &[4, 9]);
        assert_eq!(child.root_id(), 4);
        assert_eq!(child.post_id(), 9);
        assert_eq!(child.parent_id(), Some(4));
        assert_eq!(root.parent_id(), None);
        assert!(root.is_ancestor_of(&child));
        assert!(!child.is_ancestor_of(&root));
    }

    #[test]
    fn missing_parent_is_rejected() {
        assert_eq!(
            PostPath::assign(ParentLookup::Missing, 3),
            Err(DomainError::ParentNotFound)
        );
    }

    #[test]
    fn comparison_is_numeric_per_segment() {
        // Lexical string comparison would put "10" before "9".
        let a = PostPath::root(9);
        let b = PostPath::root(10);
        assert!(a < b);
        assert!(a.sort_key() < b.sort_key());
    }

    #[test]
    fn ancestors_sort_before_descendants_and_later_siblings_after() {
        let root = PostPath::root(1);
        let first = root.child(2);
        let deep = first.child(7);
        let second = root.child(3);
        let mut paths = vec![second.clone(), deep.clone(), root.clone(), first.clone()];
        paths.sort();
        assert_eq!(paths, vec![root.clone(), first.clone(), deep.clone(), second.clone()]);

        let mut keys: Vec<String> = paths.iter().rev().map(PostPath::sort_key).collect();
        keys.sort();
        let decoded: Vec<PostPath> = keys.iter().map(|k| k.parse().unwrap()).collect();
        assert_eq!(decoded, paths);
    }

    #[test]
    fn malformed_keys_are_internal_errors() {
        assert!(matches!(PostPath::from_sort_key(""), Err(DomainError::Internal(_))));
        assert!(matches!(PostPath::from_sort_key("zz"), Err(DomainError::Internal(_))));
        assert!(matches!(
            PostPath::from_sort_key("0000000000000000"),
            Err(DomainError::Internal(_))
        ));
    }
}
