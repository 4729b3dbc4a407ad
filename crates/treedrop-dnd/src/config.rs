#![forbid(unsafe_code)]

//! Coordinator configuration.

use crate::transfer::INTERNAL_TRANSFER_TYPE;

/// Configuration for a tree's drop coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeDropConfig {
    /// Transfer type reserved for internal moves (default: `"@@TRANSFER"`).
    ///
    /// Must differ from every transfer type a drop mapper is registered for.
    pub internal_transfer_type: String,
    /// Whether an external drop that matches a registered node becomes a move
    /// of that node (default: true). When false every external drop inserts.
    pub dedupe_external_drops: bool,
}

impl Default for TreeDropConfig {
    fn default() -> Self {
        Self {
            internal_transfer_type: INTERNAL_TRANSFER_TYPE.to_string(),
            dedupe_external_drops: true,
        }
    }
}

impl TreeDropConfig {
    /// Use a different reserved transfer type.
    #[must_use]
    pub fn with_internal_transfer_type(mut self, drag_type: impl Into<String>) -> Self {
        self.internal_transfer_type = drag_type.into();
        self
    }

    /// Always insert external drops, even when the id is already rendered.
    #[must_use]
    pub fn no_dedupe(mut self) -> Self {
        self.dedupe_external_drops = false;
        self
    }
}
