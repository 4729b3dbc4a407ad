#![forbid(unsafe_code)]

//! End-to-end drop scenarios through a [`TreeEditor`].
//!
//! Each test renders a small document (doc → sections → items), registers
//! every node the way a host would on mount, then replays one gesture.

use treedrop_core::edit::{Edit, Move, Origin, Placement};
use treedrop_core::path::{Path, PathSegment};
use treedrop_dnd::{
    ChildCount, DataTransfer, DragPayload, DropMappers, DropResult, InsertData, Level,
    RecordingSink, Root, TrackedNode, TreeDropConfig, TreeEditor,
};

const EXTERNAL: &str = "application/x-section-id";

struct Fixture {
    editor: TreeEditor<RecordingSink>,
    sections: Level,
    // Kept alive so their registrations stay live.
    nodes: Vec<TrackedNode>,
}

impl Fixture {
    /// `doc` with sections `s0..s{n-1}`; `s0` holds items `i0`, `i1`.
    fn new(section_count: usize, max_sections: Option<usize>) -> Self {
        let mappers = DropMappers::new()
            .with(EXTERNAL, |text| Ok(InsertData::new("section", text)))
            .with("text/x-item", |text| Ok(InsertData::new("item", text)));
        let editor = TreeEditor::new(
            Root::new("doc", "d"),
            TreeDropConfig::default(),
            mappers,
            RecordingSink::default(),
        );
        let mut sections = Level::new("section");
        if let Some(max) = max_sections {
            sections = sections.with_max_children(max);
        }
        let mut fixture = Self {
            editor,
            sections,
            nodes: Vec::new(),
        };
        for i in 0..section_count {
            let id = format!("s{i}");
            let path = fixture.section(i);
            let mut node = fixture.editor.track("section", id);
            node.mount(path, i);
            fixture.nodes.push(node);
        }
        if section_count > 0 {
            let items = Level::new("item");
            for i in 0..2 {
                let id = format!("i{i}");
                let path = items.child_path(&fixture.section(0), id.clone(), i);
                let mut node = fixture.editor.track("item", id);
                node.mount(path, i);
                fixture.nodes.push(node);
            }
        }
        fixture
    }

    fn section(&self, index: usize) -> Path {
        self.sections
            .child_path(&self.editor.root_path(), format!("s{index}"), index)
    }

    fn len(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.kind() == "section")
            .count()
    }

    fn slot(&self, index: usize) -> (Path, ChildCount) {
        let slot = self
            .sections
            .drop_slot(&self.editor.root_path(), index, self.len());
        (slot.path, slot.child_count)
    }

    fn drag(&mut self, path: &Path) -> DataTransfer {
        let kind = path.last().map(|s| s.kind.clone()).unwrap_or_default();
        DataTransfer::from(self.editor.drag_start(path, &kind).unwrap())
    }

    fn drop_at(&mut self, index: usize, transfer: &DataTransfer) -> DropResult {
        let (path, count) = self.slot(index);
        self.editor.handle_drop(&path, Some(count), transfer)
    }

    fn doc_parent(&self) -> Path {
        self.sections.enter(&self.editor.root_path())
    }
}

// ============================================================================
// Scenario A: move earlier under the same parent
// ============================================================================

#[test]
fn move_to_front_emits_single_move() {
    let mut f = Fixture::new(3, None);
    let source = f.section(2);
    let transfer = f.drag(&source);

    assert_eq!(f.drop_at(0, &transfer), DropResult::Accepted { edits: 1 });

    let expected = Edit::Move(Move {
        kind: "section".into(),
        id: "s2".into(),
        from: Origin {
            parent: f.doc_parent(),
        },
        to: Placement {
            parent: f.doc_parent(),
            index: 0,
        },
    });
    assert_eq!(f.editor.sink().changes, vec![vec![expected]]);
    assert!(f.editor.sink().errors.is_empty());
}

#[test]
fn move_later_is_index_corrected() {
    let mut f = Fixture::new(4, None);
    let transfer = f.drag(&f.section(0));
    f.drop_at(4, &transfer);

    let changes = &f.editor.sink().changes;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0][0].destination().index, 3);
}

// ============================================================================
// Scenario B: drop onto its own slot
// ============================================================================

#[test]
fn drop_in_place_emits_nothing() {
    let mut f = Fixture::new(3, None);
    let source = f.section(2);
    for slot in [2, 3] {
        let transfer = f.drag(&source);
        assert_eq!(f.drop_at(slot, &transfer), DropResult::Unchanged);
    }
    assert!(f.editor.sink().changes.is_empty());
    assert!(f.editor.sink().errors.is_empty());
}

// ============================================================================
// Scenario C: type mismatch
// ============================================================================

#[test]
fn section_onto_item_slot_is_rejected() {
    let mut f = Fixture::new(2, None);
    let transfer = f.drag(&f.section(1));
    let item_slot = Level::new("item").drop_slot(&f.section(0), 0, 2);

    let result = f
        .editor
        .handle_drop(&item_slot.path, Some(item_slot.child_count), &transfer);

    assert_eq!(
        result,
        DropResult::Rejected {
            reason: "can't drop section where item should go".into()
        }
    );
    assert!(f.editor.sink().changes.is_empty());
    assert_eq!(
        f.editor.sink().errors,
        vec!["can't drop section where item should go".to_string()]
    );
}

#[test]
fn drop_into_own_subtree_is_rejected() {
    let mut f = Fixture::new(2, None);
    let source = f.section(0);
    let transfer = f.drag(&source);
    let nested = Level::new("section")
        .with_field("subsections")
        .drop_slot(&source, 0, 0);

    let result = f.editor.handle_drop(&nested.path, None, &transfer);
    assert_eq!(
        result,
        DropResult::Rejected {
            reason: "can't drop into itself".into()
        }
    );
}

// ============================================================================
// Scenario D: external drop of an already rendered node
// ============================================================================

#[test]
fn external_duplicate_becomes_move() {
    let mut f = Fixture::new(3, None);
    let transfer = DataTransfer::from(DragPayload::text(EXTERNAL, "s2"));

    assert_eq!(f.drop_at(0, &transfer), DropResult::Accepted { edits: 1 });

    let changes = &f.editor.sink().changes;
    let Edit::Move(m) = &changes[0][0] else {
        panic!("expected a move, got {:?}", changes[0][0]);
    };
    assert_eq!(m.id, "s2");
    assert_eq!(m.from.parent, f.doc_parent());
    assert_eq!(m.to.index, 0);
}

#[test]
fn external_new_node_inserts() {
    let mut f = Fixture::new(3, None);
    let transfer = DataTransfer::from(DragPayload::text(EXTERNAL, "fresh"));
    f.drop_at(1, &transfer);

    let changes = &f.editor.sink().changes;
    let Edit::Insert(insert) = &changes[0][0] else {
        panic!("expected an insert, got {:?}", changes[0][0]);
    };
    assert_eq!(insert.id, "fresh");
    assert_eq!(insert.path.parent, f.doc_parent());
    assert_eq!(insert.path.index, 1);
}

#[test]
fn dedupe_can_be_disabled() {
    let mappers = DropMappers::new().with(EXTERNAL, |text| Ok(InsertData::new("section", text)));
    let mut editor = TreeEditor::new(
        Root::new("doc", "d"),
        TreeDropConfig::default().no_dedupe(),
        mappers,
        RecordingSink::default(),
    );
    let sections = Level::new("section");
    let mut node = editor.track("section", "s0");
    node.mount(sections.child_path(&editor.root_path(), "s0", 0), 0);

    let slot = sections.drop_slot(&editor.root_path(), 1, 1);
    let transfer = DataTransfer::from(DragPayload::text(EXTERNAL, "s0"));
    editor.handle_drop(&slot.path, Some(slot.child_count), &transfer);
    assert!(matches!(editor.sink().changes[0][0], Edit::Insert(_)));
}

#[test]
fn unknown_external_type_is_rejected() {
    let mut f = Fixture::new(1, None);
    let transfer = DataTransfer::from(DragPayload::text("text/uri-list", "https://example.com"));
    assert_eq!(
        f.drop_at(0, &transfer),
        DropResult::Rejected {
            reason: "Unable to drop this".into()
        }
    );
}

// ============================================================================
// Scenario E: capacity
// ============================================================================

#[test]
fn full_level_rejects_real_moves() {
    let mut f = Fixture::new(3, Some(3));
    let transfer = f.drag(&f.section(2));
    let result = f.drop_at(0, &transfer);
    assert_eq!(
        result,
        DropResult::Rejected {
            reason: "Cannot drop, too many children and have not implemented replace logic"
                .into()
        }
    );
    assert!(f.editor.sink().changes.is_empty());
}

#[test]
fn full_level_accepts_drop_in_place() {
    let mut f = Fixture::new(3, Some(3));
    let transfer = f.drag(&f.section(1));
    assert_eq!(f.drop_at(1, &transfer), DropResult::Unchanged);
    assert!(f.editor.sink().errors.is_empty());
}

#[test]
fn full_level_rejects_external_inserts() {
    let mut f = Fixture::new(2, Some(2));
    let transfer = DataTransfer::from(DragPayload::text(EXTERNAL, "fresh"));
    assert!(!f.drop_at(2, &transfer).is_accepted());
    assert_eq!(f.editor.sink().errors.len(), 1);
}

// ============================================================================
// Cross-level moves
// ============================================================================

#[test]
fn item_moves_between_sections() {
    let mut f = Fixture::new(2, None);
    let items = Level::new("item");
    let source = items.child_path(&f.section(0), "i1", 1);
    let transfer = f.drag(&source);
    let target = items.drop_slot(&f.section(1), 0, 0);

    f.editor
        .handle_drop(&target.path, Some(target.child_count), &transfer);

    let changes = &f.editor.sink().changes;
    let Edit::Move(m) = &changes[0][0] else {
        panic!("expected a move");
    };
    assert_eq!(m.from.parent, items.enter(&f.section(0)));
    assert_eq!(m.to.parent, items.enter(&f.section(1)));
    assert_eq!(m.to.index, 0);
}

#[test]
fn wildcard_drop_index_is_unrecognized() {
    let mut f = Fixture::new(2, None);
    let transfer = f.drag(&f.section(0));
    let path = f
        .doc_parent()
        .child(PathSegment::slot("section", 0).any_index());
    assert!(matches!(
        f.editor.handle_drop(&path, None, &transfer),
        DropResult::Rejected { .. }
    ));
}

#[test]
fn rejected_drops_leave_registry_untouched() {
    let mut f = Fixture::new(3, Some(3));
    let registry = f.editor.registry();
    let before = registry.len();
    let transfer = f.drag(&f.section(0));
    f.drop_at(3, &transfer);
    assert_eq!(registry.len(), before);
    assert_eq!(
        registry.get("section", "s0").map(|e| e.path),
        Some(f.section(0))
    );
}
