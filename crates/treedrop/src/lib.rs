#![forbid(unsafe_code)]

//! treedrop public facade crate.
//!
//! Re-exports the path algebra, edit records, registry, and drop coordinator
//! from the internal crates, plus a prelude for hosts wiring a tree up.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use treedrop_core::edit::{Edit, Insert, Move, Origin, Placement, build_insert, build_move};
pub use treedrop_core::path::{
    Path, PathSegment, has_moved, is_sibling, is_sub_path, path_for_move,
};

// --- Drag and drop re-exports ----------------------------------------------

pub use treedrop_dnd::{
    ChildCount, DataTransfer, DragPayload, DragSessionState, DropCoordinator, DropError,
    DropMappers, DropResult, DropSlot, Duplicate, DuplicateLookup, EditSink, FnSink,
    INTERNAL_TRANSFER_TYPE, InsertData, Level, NoDuplicates, RecordingSink, Registry,
    RegistryHandle, Root, TrackedNode, TransferError, TreeDropConfig, TreeEditor, drop_index,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for treedrop hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A drop was rejected.
    Drop(DropError),
    /// The internal move record could not be encoded or decoded.
    Transfer(TransferError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop(err) => write!(f, "{err}"),
            Self::Transfer(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Drop(err) => Some(err),
            Self::Transfer(err) => Some(err),
        }
    }
}

impl From<DropError> for Error {
    fn from(err: DropError) -> Self {
        Self::Drop(err)
    }
}

impl From<TransferError> for Error {
    fn from(err: TransferError) -> Self {
        Self::Transfer(err)
    }
}

/// Standard result type for treedrop APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ChildCount, DataTransfer, DropMappers, DropResult, Edit, EditSink, Error, InsertData,
        Level, Path, PathSegment, Result, Root, TrackedNode, TreeDropConfig, TreeEditor,
    };

    pub use crate::{core, dnd};
}

pub use treedrop_core as core;
pub use treedrop_dnd as dnd;
