//! ROWSORT Core - Sort-location resolution and reorder execution.
//!
//! Given a relationship description, this crate determines where a list's
//! order value physically lives (table, column, keying strategy) and applies
//! a caller-supplied ordering as atomic, targeted column updates. This
//! covers inheritance-aware table resolution, join-table semantics, and
//! versioned-stage targeting.

pub mod catalog;
pub mod error;
pub mod relation;
pub mod reorder;
pub mod resolve;
pub mod storage;

pub use catalog::{ClassDef, JoinTableDef, SchemaCatalog};
pub use error::Error;
pub use relation::RelationDescriptor;
pub use reorder::{ReorderExecutor, ReorderOutcome};
pub use resolve::{resolve, Keying, SortTarget, DEFAULT_SORT_FIELD};
pub use storage::{
    ColumnUpdate, RecordId, Row, RowKey, Stage, StageSlot, TableStore, Value, RECORD_ID_SIZE,
};
