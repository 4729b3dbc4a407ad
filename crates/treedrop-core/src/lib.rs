#![forbid(unsafe_code)]

//! Core: tree path algebra and structural edit records.

pub mod edit;
pub mod path;

pub use edit::{Edit, Insert, Move, Origin, Placement, build_insert, build_move};
pub use path::{Path, PathSegment, has_moved, is_sibling, is_sub_path, path_for_move};
