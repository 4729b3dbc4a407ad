#![forbid(unsafe_code)]

//! Host-defined drop mappers for externally sourced drops.
//!
//! A drop that carries no internal move record is offered to the mappers in
//! registration order. The first mapper whose transfer type carries data
//! converts that text into an [`InsertData`] or a rejection message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DropError;
use crate::transfer::DataTransfer;

/// Node described by an external drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertData {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl InsertData {
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Converts transferred text into insert data, or a message for the error sink.
pub type DropMapFn = Box<dyn Fn(&str) -> Result<InsertData, String>>;

/// Ordered mapping from transfer type to [`DropMapFn`].
#[derive(Default)]
pub struct DropMappers {
    mappers: Vec<(String, DropMapFn)>,
}

impl fmt::Debug for DropMappers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.mappers.iter().map(|(drag_type, _)| drag_type))
            .finish()
    }
}

impl DropMappers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapper. A later mapper for the same type replaces the earlier one
    /// but keeps its position.
    pub fn insert<F>(&mut self, drag_type: impl Into<String>, mapper: F)
    where
        F: Fn(&str) -> Result<InsertData, String> + 'static,
    {
        let drag_type = drag_type.into();
        let mapper: DropMapFn = Box::new(mapper);
        match self.mappers.iter_mut().find(|(t, _)| *t == drag_type) {
            Some(slot) => slot.1 = mapper,
            None => self.mappers.push((drag_type, mapper)),
        }
    }

    /// Builder form of [`DropMappers::insert`].
    #[must_use]
    pub fn with<F>(mut self, drag_type: impl Into<String>, mapper: F) -> Self
    where
        F: Fn(&str) -> Result<InsertData, String> + 'static,
    {
        self.insert(drag_type, mapper);
        self
    }

    /// Add a mapper that parses `{"type": .., "id": ..}` JSON.
    #[must_use]
    pub fn with_json(self, drag_type: impl Into<String>) -> Self {
        self.with(drag_type, |text| {
            serde_json::from_str(text).map_err(|err| format!("Unable to read dropped data: {err}"))
        })
    }

    /// Returns true if a mapper is registered for `drag_type`.
    #[must_use]
    pub fn contains(&self, drag_type: &str) -> bool {
        self.mappers.iter().any(|(t, _)| t == drag_type)
    }

    /// Returns true if any mapper would handle `transfer`.
    #[must_use]
    pub fn accepts(&self, transfer: &DataTransfer) -> bool {
        self.mappers
            .iter()
            .any(|(drag_type, _)| transfer.get_text(drag_type).is_some())
    }

    /// Resolve `transfer` with the first matching mapper.
    pub fn resolve(&self, transfer: &DataTransfer) -> Result<InsertData, DropError> {
        if transfer.is_empty() {
            return Err(DropError::unrecognized("Unable to drop"));
        }
        let Some((text, mapper)) = self
            .mappers
            .iter()
            .find_map(|(drag_type, mapper)| transfer.get_text(drag_type).map(|text| (text, mapper)))
        else {
            return Err(DropError::unrecognized("Unable to drop this"));
        };
        mapper(text).map_err(|message| DropError::Mapper { message })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::DragPayload;

    fn mappers() -> DropMappers {
        DropMappers::new()
            .with("text/x-section", |text| Ok(InsertData::new("section", text)))
            .with("text/x-reject", |_| Err("no thanks".to_string()))
            .with_json("application/json")
    }

    #[test]
    fn first_present_type_wins_in_registration_order() {
        let transfer = DataTransfer::new()
            .with(DragPayload::text("application/json", r#"{"type":"item","id":"i9"}"#))
            .with(DragPayload::text("text/x-section", "s9"));
        assert_eq!(mappers().resolve(&transfer), Ok(InsertData::new("section", "s9")));
    }

    #[test]
    fn json_mapper_parses() {
        let transfer = DataTransfer::from(DragPayload::text(
            "application/json",
            r#"{"type":"item","id":"i9"}"#,
        ));
        assert_eq!(mappers().resolve(&transfer), Ok(InsertData::new("item", "i9")));

        let bad = DataTransfer::from(DragPayload::text("application/json", "[]"));
        assert!(matches!(mappers().resolve(&bad), Err(DropError::Mapper { .. })));
    }

    #[test]
    fn mapper_rejection_is_forwarded() {
        let transfer = DataTransfer::from(DragPayload::text("text/x-reject", "x"));
        assert_eq!(
            mappers().resolve(&transfer),
            Err(DropError::Mapper {
                message: "no thanks".into()
            })
        );
    }

    #[test]
    fn unknown_and_empty_transfers() {
        let unknown = DataTransfer::from(DragPayload::text("text/plain", "hi"));
        assert_eq!(mappers().resolve(&unknown).unwrap_err().to_string(), "Unable to drop this");
        assert!(!mappers().accepts(&unknown));
        assert_eq!(
            mappers().resolve(&DataTransfer::new()).unwrap_err().to_string(),
            "Unable to drop"
        );
    }

    #[test]
    fn empty_entry_does_not_match() {
        let transfer = DataTransfer::new()
            .with(DragPayload::text("text/x-section", ""))
            .with(DragPayload::text("application/json", r#"{"type":"item","id":"i1"}"#));
        assert_eq!(mappers().resolve(&transfer), Ok(InsertData::new("item", "i1")));
    }

    #[test]
    fn reinserting_keeps_position() {
        let mut m = mappers();
        m.insert("text/x-section", |text| Ok(InsertData::new("chapter", text)));
        assert_eq!(m.len(), 3);
        assert!(m.contains("text/x-section"));
        let transfer = DataTransfer::from(DragPayload::text("text/x-section", "c1"));
        assert_eq!(m.resolve(&transfer), Ok(InsertData::new("chapter", "c1")));
    }
}
