#![forbid(unsafe_code)]

//! Drag transfer payloads.
//!
//! A native drag gesture carries its data through the host as a set of typed
//! entries, so nothing here may hold live references into the tree. Internal
//! moves travel as a JSON [`MoveData`] record under a reserved transfer type;
//! every other entry belongs to the host and is resolved by drop mappers.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Non-UTF-8 internal entry | Foreign writer reused the reserved type | Unrecognized drop |
//! | Bad JSON / empty path | Truncated or hand-built payload | Unrecognized drop |
//! | Empty entry | Host cleared the data | Treated as absent |

use serde::{Deserialize, Serialize};
use treedrop_core::path::Path;

use crate::error::TransferError;

/// Reserved transfer type for internal moves.
pub const INTERNAL_TRANSFER_TYPE: &str = "@@TRANSFER";

/// One typed entry of a drag transfer.
///
/// # Examples
///
/// ```
/// # use treedrop_dnd::transfer::DragPayload;
/// let payload = DragPayload::text("text/plain", "hello world");
/// assert_eq!(payload.drag_type, "text/plain");
/// assert_eq!(payload.as_text(), Some("hello world"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPayload {
    /// Transfer type the entry is keyed by.
    pub drag_type: String,
    /// Raw serialized data.
    pub data: Vec<u8>,
    /// Human-readable preview text (optional).
    pub display_text: Option<String>,
}

impl DragPayload {
    /// Create a payload with raw bytes.
    #[must_use]
    pub fn new(drag_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            drag_type: drag_type.into(),
            data,
            display_text: None,
        }
    }

    /// Create a text payload.
    #[must_use]
    pub fn text(drag_type: impl Into<String>, text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new(drag_type, text.into_bytes())
    }

    /// Attach preview text.
    #[must_use]
    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = Some(text.into());
        self
    }

    /// Attempt to decode the data as a UTF-8 string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    /// Returns true if the entry carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The data store of one drag gesture: entries keyed by transfer type, in
/// the order they were set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<DragPayload>,
}

impl DataTransfer {
    /// An empty transfer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entry, replacing any existing entry of the same type.
    pub fn set(&mut self, payload: DragPayload) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.drag_type == payload.drag_type)
        {
            Some(entry) => *entry = payload,
            None => self.entries.push(payload),
        }
    }

    /// Builder form of [`DataTransfer::set`].
    #[must_use]
    pub fn with(mut self, payload: DragPayload) -> Self {
        self.set(payload);
        self
    }

    /// Look up an entry by transfer type.
    #[must_use]
    pub fn get(&self, drag_type: &str) -> Option<&DragPayload> {
        self.entries.iter().find(|entry| entry.drag_type == drag_type)
    }

    /// Text of a non-empty UTF-8 entry.
    #[must_use]
    pub fn get_text(&self, drag_type: &str) -> Option<&str> {
        self.get(drag_type)
            .filter(|entry| !entry.is_empty())
            .and_then(DragPayload::as_text)
    }

    /// Transfer types present, in insertion order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.drag_type.as_str())
    }

    /// Returns true if no entry has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<DragPayload> for DataTransfer {
    fn from(payload: DragPayload) -> Self {
        Self::new().with(payload)
    }
}

/// Internal move record: the dragged node's path and its type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub path: Path,
    #[serde(rename = "type")]
    pub kind: String,
}

impl MoveData {
    /// Create a move record.
    #[must_use]
    pub fn new(path: Path, kind: impl Into<String>) -> Self {
        Self {
            path,
            kind: kind.into(),
        }
    }

    /// Serialize into a payload under `transfer_type`.
    pub fn encode(&self, transfer_type: &str) -> Result<DragPayload, TransferError> {
        let data = serde_json::to_vec(self)?;
        let preview = self
            .path
            .last()
            .and_then(|segment| segment.id.clone())
            .unwrap_or_else(|| self.kind.clone());
        Ok(DragPayload::new(transfer_type, data).with_display_text(preview))
    }

    /// Deserialize from a payload.
    pub fn decode(payload: &DragPayload) -> Result<Self, TransferError> {
        let text = payload.as_text().ok_or(TransferError::Encoding)?;
        let data: Self = serde_json::from_str(text)?;
        if data.path.is_empty() {
            return Err(TransferError::EmptyPath);
        }
        Ok(data)
    }
}
