//! ROWSORT - Drag-reorder persistence for editable record grids.
//!
//! The hosting grid framework supplies a relation list and a desired order;
//! this crate resolves where the order value physically lives and writes it
//! back safely. See [`OrderableRows`] for the component API and
//! [`rowsort_core`] for the resolver and executor underneath.

mod component;

pub use component::{ListContext, OrderableRows};

/// Re-export core types.
pub use rowsort_core as core;
pub use rowsort_core::{
    ClassDef, Error, JoinTableDef, Keying, RecordId, RelationDescriptor, ReorderExecutor,
    ReorderOutcome, Row, RowKey, SchemaCatalog, SortTarget, Stage, StageSlot, TableStore, Value,
    DEFAULT_SORT_FIELD,
};
