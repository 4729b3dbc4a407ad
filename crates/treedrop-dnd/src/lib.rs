#![forbid(unsafe_code)]

//! Drag and drop for rendered trees: live node registry, drag transfer,
//! drop mappers, and the coordinator that turns a drop into edits.

pub mod config;
pub mod error;
pub mod level;
pub mod logging;
pub mod mapper;
pub mod registry;
pub mod session;
pub mod transfer;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};

pub use config::TreeDropConfig;
pub use error::{DropError, TransferError};
pub use level::{ChildCount, DropSlot, Level, Root, drop_index};
pub use mapper::{DropMapFn, DropMappers, InsertData};
pub use registry::{
    DedupeKey, Duplicate, DuplicateLookup, NoDuplicates, Registry, RegistryEntry, RegistryHandle,
    TrackedNode,
};
pub use session::{
    DragSessionState, DropCoordinator, DropResult, EditSink, FnSink, RecordingSink, TreeEditor,
};
pub use transfer::{DataTransfer, DragPayload, INTERNAL_TRANSFER_TYPE, MoveData};
