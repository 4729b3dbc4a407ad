#![forbid(unsafe_code)]

//! Structural edit records handed to the consumer of a drop.
//!
//! Edits describe a change; they never apply it. The builders here assume the
//! caller has already validated the source and target paths and never fail.

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// Where a moved node came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Path of the node's former parent.
    pub parent: Path,
}

/// A position among the children of a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Path of the parent. Its final segment's child key names the collection.
    pub parent: Path,
    /// Index within that collection, already corrected for any removal.
    pub index: usize,
}

/// Move an existing node to a new position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub from: Origin,
    pub to: Placement,
}

/// Insert a node that is not yet in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insert {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub path: Placement,
}

/// A structural change emitted by a drop.
///
/// Serializes as `{"type": "MOVE" | "INSERT", "payload": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "UPPERCASE")]
pub enum Edit {
    Move(Move),
    Insert(Insert),
}

impl Edit {
    /// Collection type of the edited node.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Move(m) => &m.kind,
            Self::Insert(i) => &i.kind,
        }
    }

    /// Id of the edited node.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Move(m) => &m.id,
            Self::Insert(i) => &i.id,
        }
    }

    /// Destination of the edit.
    #[must_use]
    pub fn destination(&self) -> &Placement {
        match self {
            Self::Move(m) => &m.to,
            Self::Insert(i) => &i.path,
        }
    }
}

/// Build a `MOVE` of `id` from under `source`'s parent to `new_index` under
/// `target`'s parent.
#[must_use]
pub fn build_move(
    kind: impl Into<String>,
    id: impl Into<String>,
    source: &Path,
    target: &Path,
    new_index: usize,
) -> Edit {
    Edit::Move(Move {
        kind: kind.into(),
        id: id.into(),
        from: Origin {
            parent: source.parent(),
        },
        to: Placement {
            parent: target.parent(),
            index: new_index,
        },
    })
}

/// Build an `INSERT` of `id` at `new_index` under the parent of the drop
/// path `target`.
#[must_use]
pub fn build_insert(
    kind: impl Into<String>,
    id: impl Into<String>,
    target: &Path,
    new_index: usize,
) -> Edit {
    Edit::Insert(Insert {
        kind: kind.into(),
        id: id.into(),
        path: Placement {
            parent: target.parent(),
            index: new_index,
        },
    })
}
