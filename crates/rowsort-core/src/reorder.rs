//! Reorder execution.
//!
//! Applies a caller-supplied ordering as a set of targeted column updates
//! against the resolved sort location. All updates for one call are applied
//! in a single atomic batch; a storage failure rolls back every position
//! written in that call.

use crate::error::Error;
use crate::relation::RelationDescriptor;
use crate::resolve::{Keying, SortTarget};
use crate::storage::{ColumnUpdate, RecordId, RowKey, Stage, StageSlot, TableStore, Value};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// The result of a reorder call.
///
/// Ordering entries whose id no longer matches a row in scope are tolerated
/// (stale client state, e.g. a row deleted between page load and drop) but
/// reported here so the host can decide whether to tell the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReorderOutcome {
    /// Number of rows whose sort column was written.
    pub updated: usize,
    /// Ordering entries skipped because no matching row was found.
    pub skipped: Vec<RecordId>,
}

/// Executes reorders against a [`TableStore`].
///
/// A standalone service; the facade component is one caller among others.
pub struct ReorderExecutor<'a> {
    store: &'a TableStore,
}

impl<'a> ReorderExecutor<'a> {
    /// Create an executor over the given store.
    pub fn new(store: &'a TableStore) -> Self {
        Self { store }
    }

    /// Apply the ordering to the resolved sort target.
    ///
    /// Stores the caller's literal position values; positions are not
    /// renumbered. Rows that are relation members but absent from the
    /// ordering keep their previous sort value. Stage-aware targets are
    /// written on `stage` only; other stages are untouched. The descriptor
    /// carries the relation scope: ids outside it are skipped, never
    /// written.
    #[instrument(skip_all, fields(table = %target.table, column = %target.column))]
    pub fn reorder(
        &self,
        target: &SortTarget,
        descriptor: &RelationDescriptor,
        parent_id: RecordId,
        stage: Stage,
        ordering: &BTreeMap<i64, RecordId>,
    ) -> Result<ReorderOutcome, Error> {
        let slot = StageSlot::for_target(target.stage_aware, stage);
        let mut outcome = ReorderOutcome::default();
        let mut updates = Vec::with_capacity(ordering.len());

        for (&position, &id) in ordering {
            match self.locate(target, descriptor, slot, parent_id, id)? {
                Some(key) => updates.push(ColumnUpdate {
                    table: target.table.clone(),
                    slot,
                    key,
                    column: target.column.clone(),
                    value: Value::Int(position),
                }),
                None => outcome.skipped.push(id),
            }
        }

        self.store.apply(&updates)?;
        outcome.updated = updates.len();

        if !outcome.skipped.is_empty() {
            debug!(
                skipped = outcome.skipped.len(),
                "Ordering contained ids with no matching row"
            );
        }

        Ok(outcome)
    }

    /// Locate the physical row holding the order value for one ordering
    /// entry, or `None` when the id is not in scope.
    fn locate(
        &self,
        target: &SortTarget,
        descriptor: &RelationDescriptor,
        slot: StageSlot,
        parent_id: RecordId,
        id: RecordId,
    ) -> Result<Option<RowKey>, Error> {
        match &target.keying {
            Keying::ById => {
                // A join-table-backed list whose order column resolved to
                // the record's own table is still scoped by membership:
                // no join row, no write.
                if let RelationDescriptor::JoinTable { join_table, .. } = descriptor {
                    let membership = RowKey::Pair(parent_id, id);
                    if !self
                        .store
                        .contains(join_table, StageSlot::Unstaged, &membership)?
                    {
                        return Ok(None);
                    }
                }

                let key = RowKey::Id(id);
                Ok(self.store.contains(&target.table, slot, &key)?.then_some(key))
            }

            Keying::ByPair => {
                let key = RowKey::Pair(parent_id, id);
                Ok(self.store.contains(&target.table, slot, &key)?.then_some(key))
            }

            Keying::ByIntermediary {
                parent_key,
                child_key,
            } => {
                // The intermediary row is found by its references, then
                // updated under its own key.
                for entry in self.store.scan(&target.table, slot) {
                    let (key, row) = entry?;
                    if row.get(parent_key) == Some(&Value::Id(parent_id))
                        && row.get(child_key) == Some(&Value::Id(id))
                    {
                        return Ok(Some(key));
                    }
                }
                Ok(None)
            }
        }
    }
}
