#![forbid(unsafe_code)]

//! Tree positions as segment chains, and the algebra over them.
//!
//! A [`Path`] locates a node (or a drop slot) by listing one [`PathSegment`]
//! per nesting level, root first. Each segment names the collection type, the
//! item id, and the sibling index. A segment's `children_key` names the child
//! collection *of that node* that the next segment lives in, so a node's own
//! final segment normally carries no key until a level beneath it is entered.
//!
//! # Invariants
//!
//! 1. [`is_sub_path`] is irreflexive: a path is never a sub-path of a candidate
//!    of equal or shorter length.
//! 2. [`has_moved`]`(p, p)` is `false` for every `p`.
//! 3. [`path_for_move`] only ever changes the index at the source's own level,
//!    and only by decrementing it by one.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// One level of tree nesting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    /// Collection type at this level (e.g. `"section"`). Empty means "any".
    #[serde(rename = "type")]
    pub kind: String,
    /// Item id. Drop slots name a position rather than an item and leave it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Sibling index. `None` acts as a wildcard in [`is_sub_path`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Child collection of this node that the next segment lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_key: Option<String>,
}

impl PathSegment {
    /// Segment for a rendered node.
    #[must_use]
    pub fn node(kind: impl Into<String>, id: impl Into<String>, index: usize) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
            index: Some(index),
            children_key: None,
        }
    }

    /// Segment for a drop slot: a position among siblings with no item in it.
    #[must_use]
    pub fn slot(kind: impl Into<String>, index: usize) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            index: Some(index),
            children_key: None,
        }
    }

    /// Set the child collection key.
    #[must_use]
    pub fn with_children_key(mut self, key: impl Into<String>) -> Self {
        self.children_key = Some(key.into());
        self
    }

    /// Clear the index, turning it into a wildcard.
    #[must_use]
    pub fn any_index(mut self) -> Self {
        self.index = None;
        self
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)?;
        if let Some(id) = &self.id {
            write!(f, ":{id}")?;
        }
        match self.index {
            Some(index) => write!(f, "[{index}]")?,
            None => f.write_str("[*]")?,
        }
        if let Some(key) = &self.children_key {
            write!(f, ".{key}")?;
        }
        Ok(())
    }
}

/// Ordered chain of segments from the tree root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Borrow the segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Consume the path into its segments.
    #[must_use]
    pub fn into_segments(self) -> Vec<PathSegment> {
        self.0
    }

    /// This path minus its last segment. The parent of the empty path is empty.
    #[must_use]
    pub fn parent(&self) -> Path {
        match self.0.split_last() {
            Some((_, rest)) => Self(rest.to_vec()),
            None => Self::new(),
        }
    }

    /// A copy of this path extended by `segment`.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Path {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment);
        Self(segments)
    }

    /// A copy of this path whose final segment carries `key` as its child
    /// collection key. The empty path is returned unchanged.
    #[must_use]
    pub fn with_children_key(&self, key: impl Into<String>) -> Path {
        let mut out = self.clone();
        if let Some(last) = out.0.last_mut() {
            last.children_key = Some(key.into());
        }
        out
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }
}

impl Deref for Path {
    type Target = [PathSegment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Returns true if `candidate` lies strictly inside the subtree rooted at `path`.
///
/// Each segment of `path` must match the corresponding prefix segment of
/// `candidate`:
///
/// - the index must match unless `path`'s index is a wildcard;
/// - the type must match unless `path`'s type is empty;
/// - the child collection key must match, except on the final segment of
///   `path` when that segment has no key of its own. A dragged node carries no
///   key, while paths into its children carry the key of the entered level.
#[must_use]
pub fn is_sub_path(path: &Path, candidate: &Path) -> bool {
    if path.is_empty() || candidate.len() <= path.len() {
        return false;
    }
    let last = path.len() - 1;
    path.iter()
        .zip(candidate.iter())
        .enumerate()
        .all(|(i, (own, other))| {
            let index_matches = own.index.is_none() || own.index == other.index;
            let type_matches = own.kind.is_empty() || own.kind == other.kind;
            let key_matches = own.children_key == other.children_key
                || (i == last && own.children_key.is_none());
            index_matches && type_matches && key_matches
        })
}

/// Correct `target` for the index shift caused by removing `source` first.
///
/// Walking `target` level by level: while above the source's own level, any
/// index or child key disagreement means the two live in different subtrees
/// and `target` is returned unchanged. At the source's own level, when both
/// are in the same collection and the target comes after the source, the
/// target index is decremented. Deeper segments pass through.
#[must_use]
pub fn path_for_move(source: &Path, target: &Path) -> Path {
    let Some(level) = source.len().checked_sub(1) else {
        return target.clone();
    };

    let mut out = Vec::with_capacity(target.len());
    for (i, segment) in target.iter().enumerate() {
        if i < level {
            let own = &source[i];
            if own.index != segment.index || own.children_key != segment.children_key {
                return target.clone();
            }
            out.push(segment.clone());
            continue;
        }

        if i == level && source[i].children_key == segment.children_key {
            if let (Some(from), Some(to)) = (source[i].index, segment.index) {
                if from < to {
                    out.push(PathSegment {
                        index: Some(to - 1),
                        ..segment.clone()
                    });
                    continue;
                }
            }
        }
        out.push(segment.clone());
    }
    Path(out)
}

/// Returns true if dropping `source` at `target` changes its effective position.
///
/// `target` is corrected with [`path_for_move`] first; the drop is a no-op when
/// the corrected parent path and final index equal the source's.
#[must_use]
pub fn has_moved(source: &Path, target: &Path) -> bool {
    let corrected = path_for_move(source, target);
    let index = |path: &Path| path.last().and_then(|segment| segment.index);
    corrected.parent() != source.parent() || index(&corrected) != index(source)
}

/// Returns true if `a` and `b` are non-empty and share the same parent path.
#[must_use]
pub fn is_sibling(a: &Path, b: &Path) -> bool {
    !a.is_empty() && a.len() == b.len() && a.parent() == b.parent()
}
