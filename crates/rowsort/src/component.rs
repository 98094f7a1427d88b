//! The orderable-rows component: configuration plus the two entry points
//! exposed to the hosting grid framework.

use rowsort_core::{
    resolve, RecordId, RelationDescriptor, ReorderExecutor, ReorderOutcome, SchemaCatalog, Stage,
    TableStore, DEFAULT_SORT_FIELD,
};
use std::collections::BTreeMap;
use tracing::instrument;

/// Everything the hosting framework knows about the list being reordered.
///
/// Built per call from the live relation metadata; the stage is threaded
/// explicitly, never read from ambient state.
pub struct ListContext<'a> {
    /// Schema metadata for resolution.
    pub catalog: &'a SchemaCatalog,
    /// Store the relation's rows live in.
    pub store: &'a TableStore,
    /// Shape of the relationship backing the list.
    pub descriptor: RelationDescriptor,
    /// Id of the record owning the list.
    pub parent_id: RecordId,
    /// Stage the calling list is reading from.
    pub stage: Stage,
}

/// Grid component that persists drag-reorder gestures.
///
/// Holds no state between calls beyond its configuration.
#[derive(Debug, Clone)]
pub struct OrderableRows {
    sort_field: String,
}

impl OrderableRows {
    /// Create a component with the default sort field (`"Sort"`).
    pub fn new() -> Self {
        Self {
            sort_field: DEFAULT_SORT_FIELD.to_string(),
        }
    }

    /// Create a component with a custom sort field.
    pub fn with_sort_field(sort_field: impl Into<String>) -> Self {
        Self {
            sort_field: sort_field.into(),
        }
    }

    /// Change the configured sort field.
    pub fn set_sort_field(&mut self, sort_field: impl Into<String>) -> &mut Self {
        self.sort_field = sort_field.into();
        self
    }

    /// The configured sort field name.
    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    /// Resolve just the physical table name holding the list's order value.
    ///
    /// Read-only; used by callers that need to know the storage location
    /// without performing a write.
    pub fn get_sort_table(&self, list: &ListContext<'_>) -> Result<String, rowsort_core::Error> {
        let target = resolve(&list.descriptor, &self.sort_field, list.catalog)?;
        Ok(target.table)
    }

    /// Persist a reorder gesture.
    ///
    /// Resolves the sort location (aborting before any write on
    /// misconfiguration), then applies the ordering atomically. The hosting
    /// framework re-reads the list for display.
    #[instrument(skip(self, list, ordering), fields(sort_field = %self.sort_field))]
    pub fn execute_reorder(
        &self,
        list: &ListContext<'_>,
        ordering: &BTreeMap<i64, RecordId>,
    ) -> Result<ReorderOutcome, rowsort_core::Error> {
        let target = resolve(&list.descriptor, &self.sort_field, list.catalog)?;
        ReorderExecutor::new(list.store).reorder(
            &target,
            &list.descriptor,
            list.parent_id,
            list.stage,
            ordering,
        )
    }
}

impl Default for OrderableRows {
    fn default() -> Self {
        Self::new()
    }
}
