#![forbid(unsafe_code)]

//! Drop rejection and transfer decoding errors.
//!
//! Every variant is recoverable: a rejected drop emits no edits and leaves the
//! registry untouched.

use std::fmt;

/// Message used for full collections; there is no replace policy.
pub const TOO_MANY_CHILDREN: &str =
    "Cannot drop, too many children and have not implemented replace logic";

/// Why a drop produced no edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    /// The dragged node's type differs from the type expected at the target.
    TypeMismatch { drag_type: String, expected: String },
    /// The target lies inside the dragged node's own subtree.
    IntoItself,
    /// The target collection is full.
    TooManyChildren {
        children_count: usize,
        max_children: usize,
    },
    /// Neither an internal move record nor a known external type was present,
    /// or the data carried was malformed.
    Unrecognized { reason: String },
    /// A host drop mapper rejected the transferred data.
    Mapper { message: String },
}

impl DropError {
    pub(crate) fn unrecognized(reason: impl Into<String>) -> Self {
        Self::Unrecognized {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                drag_type,
                expected,
            } => write!(f, "can't drop {drag_type} where {expected} should go"),
            Self::IntoItself => f.write_str("can't drop into itself"),
            Self::TooManyChildren { .. } => f.write_str(TOO_MANY_CHILDREN),
            Self::Unrecognized { reason } => f.write_str(reason),
            Self::Mapper { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for DropError {}

/// Failure to encode or decode the internal move record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The payload bytes are not UTF-8.
    Encoding,
    /// The payload is not a valid move record.
    Decode(String),
    /// The move record carries an empty path.
    EmptyPath,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => f.write_str("transfer data is not valid UTF-8"),
            Self::Decode(detail) => write!(f, "malformed move record: {detail}"),
            Self::EmptyPath => f.write_str("move record has an empty path"),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<serde_json::Error> for TransferError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
