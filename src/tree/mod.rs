//! Notebook hierarchy: a forest of categories linked by parent id.
//!
//! Records are the only source of truth for `id`, `name` and `parent_id`.
//! Everything else (`path`, `level`, `children`) is a view recomputed by
//! [`build`], and every structural change is fed back through it.

pub mod builder;
pub mod math;
pub mod mutator;
pub mod query;

pub use builder::build;
pub use math::{TreeIndex, level_of, path_of};
pub use mutator::{
    deletion_set, ensure_deletable, is_root, move_category, root_count,
};
pub use query::{CountableNote, TERMINAL_STATUSES, find, flatten, roots, with_counts};
