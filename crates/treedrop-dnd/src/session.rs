#![forbid(unsafe_code)]

//! Drag/drop session coordination.
//!
//! [`DropCoordinator`] turns one drag gesture into zero or one structural
//! [`Edit`]. [`TreeEditor`] is the per-tree session object that owns the
//! shared registry, the coordinator, and the sink edits and errors go to.
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Dragging (on_drag_start) -> Idle (on_drop)
//! ```
//!
//! A drag that never drops leaves the coordinator in `Dragging` until the
//! next `on_drag_start` replaces it.
//!
//! # Drop resolution
//!
//! | Transfer contents | Path taken |
//! |-------------------|------------|
//! | Internal move record | type check, self-containment, capacity, index correction, `MOVE` |
//! | External entry with a mapper | capacity, mapper, type check, dedupe lookup, `MOVE` or `INSERT` |
//! | Neither / malformed | Unrecognized drop |
//!
//! Every rejection leaves the registry untouched and emits no edits.

use treedrop_core::edit::{Edit, build_insert, build_move};
use treedrop_core::path::{Path, has_moved, is_sub_path, path_for_move};

use crate::config::TreeDropConfig;
use crate::error::{DropError, TransferError};
use crate::level::{ChildCount, Root};
use crate::mapper::{DropMappers, InsertData};
use crate::registry::{DuplicateLookup, RegistryHandle, TrackedNode};
use crate::transfer::{DataTransfer, DragPayload, MoveData};

// ---------------------------------------------------------------------------
// DragSessionState
// ---------------------------------------------------------------------------

/// The active drag, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSessionState {
    #[default]
    Idle,
    Dragging { source_path: Path, kind: String },
}

// ---------------------------------------------------------------------------
// DropCoordinator
// ---------------------------------------------------------------------------

/// Resolves drops into edits.
#[derive(Debug, Default)]
pub struct DropCoordinator {
    config: TreeDropConfig,
    mappers: DropMappers,
    state: DragSessionState,
}

impl DropCoordinator {
    #[must_use]
    pub fn new(config: TreeDropConfig, mappers: DropMappers) -> Self {
        Self {
            config,
            mappers,
            state: DragSessionState::Idle,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TreeDropConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &DragSessionState {
        &self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragSessionState::Dragging { .. })
    }

    /// Begin dragging the node at `path` and produce the payload the host
    /// attaches to its native drag. Replaces any drag already in progress.
    pub fn on_drag_start(&mut self, path: &Path, kind: &str) -> Result<DragPayload, TransferError> {
        let payload =
            MoveData::new(path.clone(), kind).encode(&self.config.internal_transfer_type)?;
        if self.is_dragging() {
            crate::debug!(%path, "drag started while another was active; replacing");
        }
        crate::debug!(%path, kind, "drag start");
        self.state = DragSessionState::Dragging {
            source_path: path.clone(),
            kind: kind.to_string(),
        };
        Ok(payload)
    }

    /// Returns true if dropping `transfer` would be attempted at all.
    #[must_use]
    pub fn on_drag_over(&self, transfer: &DataTransfer) -> bool {
        transfer
            .get_text(&self.config.internal_transfer_type)
            .is_some()
            || self.mappers.accepts(transfer)
    }

    /// Abandon any active drag.
    pub fn reset(&mut self) {
        self.state = DragSessionState::Idle;
    }

    /// Resolve a drop at `drop_path`.
    ///
    /// Returns the edits to apply, which may be empty for a drop that does not
    /// change anything. Always returns the coordinator to `Idle`.
    pub fn on_drop(
        &mut self,
        drop_path: &Path,
        lookup: &dyn DuplicateLookup,
        child_count: Option<ChildCount>,
        transfer: &DataTransfer,
    ) -> Result<Vec<Edit>, DropError> {
        let span = crate::debug_span!("drop", target = %drop_path);
        let _guard = span.enter();
        self.state = DragSessionState::Idle;

        let result = self.resolve(drop_path, lookup, child_count, transfer);
        match &result {
            Ok(edits) => {
                crate::debug!(edits = edits.len(), "drop resolved");
            }
            Err(err) => {
                crate::warn!(error = %err, "drop rejected");
            }
        }
        result
    }

    fn resolve(
        &self,
        drop_path: &Path,
        lookup: &dyn DuplicateLookup,
        child_count: Option<ChildCount>,
        transfer: &DataTransfer,
    ) -> Result<Vec<Edit>, DropError> {
        if drop_path.is_empty() {
            return Err(DropError::unrecognized("Unable to drop"));
        }

        if let Some(entry) = transfer.get(&self.config.internal_transfer_type) {
            if !entry.is_empty() {
                let data = MoveData::decode(entry).map_err(|err| {
                    crate::warn!(error = %err, "discarding internal transfer");
                    DropError::unrecognized("Unable to drop")
                })?;
                return self.resolve_move(&data.path, drop_path, child_count);
            }
        }

        if let Some(count) = child_count.filter(ChildCount::is_full) {
            return Err(too_many_children(count));
        }

        let data = self.mappers.resolve(transfer)?;
        self.resolve_insert(data, drop_path, lookup)
    }

    fn resolve_move(
        &self,
        drag_path: &Path,
        drop_path: &Path,
        child_count: Option<ChildCount>,
    ) -> Result<Vec<Edit>, DropError> {
        let (Some(source), Some(target)) = (drag_path.last(), drop_path.last()) else {
            return Err(DropError::unrecognized("Unable to drop"));
        };

        if source.kind != target.kind {
            return Err(DropError::TypeMismatch {
                drag_type: source.kind.clone(),
                expected: target.kind.clone(),
            });
        }

        let Some(id) = source.id.as_deref() else {
            return Err(DropError::unrecognized("Unable to drop"));
        };

        if is_sub_path(drag_path, drop_path) {
            return Err(DropError::IntoItself);
        }

        if !has_moved(drag_path, drop_path) {
            crate::debug!(%drag_path, "dropped in place");
            return Ok(Vec::new());
        }

        if let Some(count) = child_count.filter(ChildCount::is_full) {
            return Err(too_many_children(count));
        }

        let move_path = path_for_move(drag_path, drop_path);
        let Some(index) = move_path.last().and_then(|segment| segment.index) else {
            return Err(DropError::unrecognized("Unable to drop"));
        };

        Ok(vec![build_move(
            source.kind.clone(),
            id,
            drag_path,
            &move_path,
            index,
        )])
    }

    fn resolve_insert(
        &self,
        data: InsertData,
        drop_path: &Path,
        lookup: &dyn DuplicateLookup,
    ) -> Result<Vec<Edit>, DropError> {
        let Some(target) = drop_path.last() else {
            return Err(DropError::unrecognized("Unable to drop"));
        };

        if data.kind != target.kind {
            return Err(DropError::TypeMismatch {
                drag_type: data.kind,
                expected: target.kind.clone(),
            });
        }

        if self.config.dedupe_external_drops {
            if let Some(duplicate) = lookup.get_duplicate(&data.kind, &data.id) {
                crate::debug!(id = %data.id, existing = %duplicate.path, "external drop is a move");
                return self.resolve_move(&duplicate.path, drop_path, None);
            }
        }

        let Some(index) = target.index else {
            return Err(DropError::unrecognized("Unable to drop"));
        };
        Ok(vec![build_insert(data.kind, data.id, drop_path, index)])
    }
}

fn too_many_children(count: ChildCount) -> DropError {
    DropError::TooManyChildren {
        children_count: count.children_count,
        max_children: count.max_children.unwrap_or(count.children_count),
    }
}

// ---------------------------------------------------------------------------
// EditSink
// ---------------------------------------------------------------------------

/// Consumer of drop outcomes.
pub trait EditSink {
    /// Called with a non-empty list of edits.
    fn on_change(&mut self, edits: Vec<Edit>);

    /// Called when a drop is rejected.
    fn on_error(&mut self, _error: &DropError) {}
}

/// [`EditSink`] built from two closures.
pub struct FnSink<C, E> {
    on_change: C,
    on_error: E,
}

impl<C, E> FnSink<C, E>
where
    C: FnMut(Vec<Edit>),
    E: FnMut(String),
{
    #[must_use]
    pub fn new(on_change: C, on_error: E) -> Self {
        Self {
            on_change,
            on_error,
        }
    }
}

impl<C, E> EditSink for FnSink<C, E>
where
    C: FnMut(Vec<Edit>),
    E: FnMut(String),
{
    fn on_change(&mut self, edits: Vec<Edit>) {
        (self.on_change)(edits);
    }

    fn on_error(&mut self, error: &DropError) {
        (self.on_error)(error.to_string());
    }
}

/// Sink that keeps everything it receives.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    pub changes: Vec<Vec<Edit>>,
    pub errors: Vec<String>,
}

impl EditSink for RecordingSink {
    fn on_change(&mut self, edits: Vec<Edit>) {
        self.changes.push(edits);
    }

    fn on_error(&mut self, error: &DropError) {
        self.errors.push(error.to_string());
    }
}

// ---------------------------------------------------------------------------
// DropResult
// ---------------------------------------------------------------------------

/// Outcome of one drop as seen by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropResult {
    /// Edits were delivered to the sink.
    Accepted { edits: usize },
    /// The drop was valid but changed nothing.
    Unchanged,
    /// The drop was rejected and the error delivered to the sink.
    Rejected {
        /// Human-readable explanation for why the drop was rejected.
        reason: String,
    },
}

impl DropResult {
    /// Returns true if edits were delivered.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

// ---------------------------------------------------------------------------
// TreeEditor
// ---------------------------------------------------------------------------

/// One tree-editing session: registry, coordinator, and sink.
///
/// Starts with an empty registry plus the root node's own registration.
/// [`TreeEditor::teardown`] drops every entry.
pub struct TreeEditor<S: EditSink> {
    root: Root,
    registry: RegistryHandle,
    coordinator: DropCoordinator,
    root_node: TrackedNode,
    sink: S,
}

impl<S: EditSink> TreeEditor<S> {
    #[must_use]
    pub fn new(root: Root, config: TreeDropConfig, mappers: DropMappers, sink: S) -> Self {
        let registry = RegistryHandle::new();
        let mut root_node = TrackedNode::new(registry.clone(), root.kind.clone(), root.id.clone());
        root_node.mount(root.path(), 0);
        Self {
            root,
            registry,
            coordinator: DropCoordinator::new(config, mappers),
            root_node,
            sink,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Root {
        &self.root
    }

    #[must_use]
    pub fn root_path(&self) -> Path {
        self.root.path()
    }

    /// Handle to this tree's registry, for nodes rendered inside it.
    #[must_use]
    pub fn registry(&self) -> RegistryHandle {
        self.registry.clone()
    }

    /// Start tracking a node of this tree.
    #[must_use]
    pub fn track(&self, kind: impl Into<String>, id: impl Into<String>) -> TrackedNode {
        TrackedNode::new(self.registry.clone(), kind, id)
    }

    #[must_use]
    pub fn coordinator(&self) -> &DropCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn drag_start(&mut self, path: &Path, kind: &str) -> Result<DragPayload, TransferError> {
        self.coordinator.on_drag_start(path, kind)
    }

    #[must_use]
    pub fn drag_over(&self, transfer: &DataTransfer) -> bool {
        self.coordinator.on_drag_over(transfer)
    }

    /// Resolve a drop against this tree's registry and deliver the outcome.
    pub fn handle_drop(
        &mut self,
        drop_path: &Path,
        child_count: Option<ChildCount>,
        transfer: &DataTransfer,
    ) -> DropResult {
        let outcome = self
            .coordinator
            .on_drop(drop_path, &self.registry, child_count, transfer);
        match outcome {
            Ok(edits) if edits.is_empty() => DropResult::Unchanged,
            Ok(edits) => {
                let count = edits.len();
                self.sink.on_change(edits);
                DropResult::Accepted { edits: count }
            }
            Err(err) => {
                self.sink.on_error(&err);
                DropResult::Rejected {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Drop every registry entry and abandon any drag.
    pub fn teardown(&mut self) {
        self.root_node.unmount();
        self.registry.clear();
        self.coordinator.reset();
    }

    /// Tear down and hand back the sink.
    pub fn into_sink(mut self) -> S {
        self.teardown();
        self.sink
    }
}
