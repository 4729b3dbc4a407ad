#![forbid(unsafe_code)]

//! Live node registry used to deduplicate drops.
//!
//! The registry maps `(type, dedupe key)` to the current path of the node
//! rendered under that key. Nodes register on mount and on every update, and
//! deregister on unmount. An external drop whose id is already registered
//! becomes a move of the existing node instead of a second insert.
//!
//! # Invariants
//!
//! 1. At most one entry per `(type, dedupe key)`; the latest registration wins.
//! 2. A [`TrackedNode`] registers its new position before releasing its old
//!    one, so a moving node is never transiently absent.
//! 3. A node only releases an entry that still points at the path it
//!    registered; an unmount that races a newer mount elsewhere is a no-op.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use treedrop_core::path::Path;

/// Registry key: collection type plus dedupe key (the node id by default).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupeKey {
    pub kind: String,
    pub key: String,
}

impl DedupeKey {
    #[must_use]
    pub fn new(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: key.into(),
        }
    }
}

/// Current position of a registered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub path: Path,
    pub index: usize,
}

/// A node already present in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub path: Path,
}

/// Capability to look up an already-rendered node by type and id.
pub trait DuplicateLookup {
    fn get_duplicate(&self, kind: &str, id: &str) -> Option<Duplicate>;
}

/// Lookup that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDuplicates;

impl DuplicateLookup for NoDuplicates {
    fn get_duplicate(&self, _kind: &str, _id: &str) -> Option<Duplicate> {
        None
    }
}

/// Map from `(type, dedupe key)` to current position.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<DedupeKey, RegistryEntry>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `(kind, key)`.
    pub fn register(&mut self, kind: &str, key: &str, path: Path, index: usize) {
        crate::trace!(kind, key, %path, index, "register");
        self.entries
            .insert(DedupeKey::new(kind, key), RegistryEntry { path, index });
    }

    /// Remove the entry for `(kind, key)` if present.
    pub fn deregister(&mut self, kind: &str, key: &str) {
        if self.entries.remove(&DedupeKey::new(kind, key)).is_some() {
            crate::trace!(kind, key, "deregister");
        }
    }

    /// Remove the entry for `(kind, key)` only if it still points at `path`.
    ///
    /// Returns true if an entry was removed.
    pub fn release(&mut self, kind: &str, key: &str, path: &Path) -> bool {
        let dedupe_key = DedupeKey::new(kind, key);
        match self.entries.get(&dedupe_key) {
            Some(entry) if entry.path == *path => {
                self.entries.remove(&dedupe_key);
                crate::trace!(kind, key, %path, "release");
                true
            }
            Some(_) => {
                crate::trace!(kind, key, %path, "release skipped, key re-registered elsewhere");
                false
            }
            None => false,
        }
    }

    /// Entry for `(kind, key)`.
    #[must_use]
    pub fn get(&self, kind: &str, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(&DedupeKey::new(kind, key))
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl DuplicateLookup for Registry {
    fn get_duplicate(&self, kind: &str, id: &str) -> Option<Duplicate> {
        self.get(kind, id).map(|entry| Duplicate {
            path: entry.path.clone(),
        })
    }
}

/// Shared handle to one tree's registry.
///
/// Cloning the handle shares the registry. The tree is single-threaded and no
/// borrow is held across calls, so each method borrows only for its own body.
#[derive(Debug, Clone, Default)]
pub struct RegistryHandle {
    inner: Rc<RefCell<Registry>>,
}

impl RegistryHandle {
    /// A handle to a fresh, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, kind: &str, key: &str, path: Path, index: usize) {
        self.inner.borrow_mut().register(kind, key, path, index);
    }

    pub fn deregister(&self, kind: &str, key: &str) {
        self.inner.borrow_mut().deregister(kind, key);
    }

    pub fn release(&self, kind: &str, key: &str, path: &Path) -> bool {
        self.inner.borrow_mut().release(kind, key, path)
    }

    /// Clone of the entry for `(kind, key)`.
    #[must_use]
    pub fn get(&self, kind: &str, key: &str) -> Option<RegistryEntry> {
        self.inner.borrow().get(kind, key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    /// Returns true if both handles share one registry.
    #[must_use]
    pub fn same_registry(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl DuplicateLookup for RegistryHandle {
    fn get_duplicate(&self, kind: &str, id: &str) -> Option<Duplicate> {
        self.inner.borrow().get_duplicate(kind, id)
    }
}

/// Registration of one rendered node.
///
/// Holds the registry handle it was built with. `mount` and `update` record
/// the node's current path; `unmount` (or dropping the node) releases it.
#[derive(Debug)]
pub struct TrackedNode {
    registry: RegistryHandle,
    kind: String,
    dedupe_key: String,
    registered: Option<Path>,
}

impl TrackedNode {
    /// Track a node whose dedupe key is its id.
    #[must_use]
    pub fn new(registry: RegistryHandle, kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            registry,
            kind: kind.into(),
            dedupe_key: id.into(),
            registered: None,
        }
    }

    /// Use an explicit dedupe key instead of the id.
    #[must_use]
    pub fn with_dedupe_key(mut self, key: impl Into<String>) -> Self {
        self.dedupe_key = key.into();
        self
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn dedupe_key(&self) -> &str {
        &self.dedupe_key
    }

    /// Path last registered, if mounted.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.registered.as_ref()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.registered.is_some()
    }

    /// Record the node's first position.
    pub fn mount(&mut self, path: Path, index: usize) {
        self.reregister(path, index);
    }

    /// Record a new position after a re-render.
    pub fn update(&mut self, path: Path, index: usize) {
        self.reregister(path, index);
    }

    /// Change the dedupe key, registering under the new key before releasing
    /// the old one.
    pub fn rekey(&mut self, key: impl Into<String>, path: Path, index: usize) {
        let old_key = std::mem::replace(&mut self.dedupe_key, key.into());
        let old_path = self.registered.take();
        self.reregister(path, index);
        if let Some(old_path) = old_path {
            if old_key != self.dedupe_key {
                self.registry.release(&self.kind, &old_key, &old_path);
            }
        }
    }

    /// Release the node's registration.
    pub fn unmount(&mut self) {
        if let Some(path) = self.registered.take() {
            self.registry.release(&self.kind, &self.dedupe_key, &path);
        }
    }

    // Overwriting the same key is the register-then-release ordering
    // collapsed into one step.
    fn reregister(&mut self, path: Path, index: usize) {
        self.registry
            .register(&self.kind, &self.dedupe_key, path.clone(), index);
        self.registered = Some(path);
    }
}

impl Drop for TrackedNode {
    fn drop(&mut self) {
        self.unmount();
    }
}
