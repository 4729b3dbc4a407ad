#![forbid(unsafe_code)]

//! Rendered child collections and the drop slots between their children.
//!
//! A [`Level`] is one keyed collection under a parent node, such as the
//! `sections` of a document. Rendering a level with `n` children yields
//! `n + 1` drop slots: one before each child and one after the last.

use serde::{Deserialize, Serialize};
use treedrop_core::path::{Path, PathSegment};

/// Child-count context of one drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildCount {
    pub children_count: usize,
    /// `None` is unbounded.
    pub max_children: Option<usize>,
}

impl ChildCount {
    #[must_use]
    pub const fn new(children_count: usize, max_children: Option<usize>) -> Self {
        Self {
            children_count,
            max_children,
        }
    }

    /// Returns true if another child would exceed the limit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.max_children
            .is_some_and(|max| self.children_count >= max)
    }
}

/// One position a dragged node can be dropped at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropSlot {
    /// Drop path: the entered parent plus a slot segment.
    pub path: Path,
    pub child_count: ChildCount,
}

/// A keyed child collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    kind: String,
    field: String,
    max_children: Option<usize>,
}

impl Level {
    /// A level of `kind` children stored under the field `"{kind}s"`.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            field: format!("{kind}s"),
            kind,
            max_children: None,
        }
    }

    /// Store children under a different field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Cap the number of children.
    #[must_use]
    pub fn with_max_children(mut self, max: usize) -> Self {
        self.max_children = Some(max);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn max_children(&self) -> Option<usize> {
        self.max_children
    }

    /// The parent path with this level's field as its child key.
    #[must_use]
    pub fn enter(&self, parent: &Path) -> Path {
        parent.with_children_key(self.field.clone())
    }

    /// Path of the child `id` at `index`.
    #[must_use]
    pub fn child_path(&self, parent: &Path, id: impl Into<String>, index: usize) -> Path {
        self.enter(parent)
            .child(PathSegment::node(self.kind.clone(), id, index))
    }

    /// Drop slot `index` for a level currently holding `len` children.
    #[must_use]
    pub fn drop_slot(&self, parent: &Path, index: usize, len: usize) -> DropSlot {
        DropSlot {
            path: self
                .enter(parent)
                .child(PathSegment::slot(self.kind.clone(), index)),
            child_count: ChildCount::new(len, self.max_children),
        }
    }

    /// All `len + 1` drop slots, in order.
    #[must_use]
    pub fn drop_slots(&self, parent: &Path, len: usize) -> Vec<DropSlot> {
        (0..=len)
            .map(|index| self.drop_slot(parent, index, len))
            .collect()
    }
}

/// The root node of an edited tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub kind: String,
    pub id: String,
}

impl Root {
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// `[{type, id, index: 0}]`.
    #[must_use]
    pub fn path(&self) -> Path {
        Path::from(vec![PathSegment::node(
            self.kind.clone(),
            self.id.clone(),
            0,
        )])
    }
}

/// Map a pointer offset within a node's extent to a drop index.
///
/// The leading half drops before the node (`index`), the trailing half after
/// it (`index + 1`). A zero extent always drops before.
#[must_use]
pub fn drop_index(index: usize, offset: u16, extent: u16) -> usize {
    if extent == 0 {
        return index;
    }
    if u32::from(offset) * 2 > u32::from(extent) {
        index + 1
    } else {
        index
    }
}
