//! Row store implementation.

use super::key::{data_key, slot_prefix, RowKey, Stage, StageSlot};
use super::row::{Row, Value};
use crate::error::Error;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Tree};
use std::path::Path;
use tracing::debug;

/// Tree name for row data.
const ROWS_TREE: &str = "rows";

/// A single-column targeted write against one physical row.
#[derive(Debug, Clone)]
pub struct ColumnUpdate {
    /// Physical table name.
    pub table: String,
    /// Storage slot (unstaged, or one stage of a versioned table).
    pub slot: StageSlot,
    /// Row address within the table.
    pub key: RowKey,
    /// Column to write.
    pub column: String,
    /// New value.
    pub value: Value,
}

/// The row store wrapping sled.
///
/// Rows are stored per table and stage slot. Updates touch exactly one
/// column of one row; batched updates are applied atomically.
pub struct TableStore {
    /// The underlying sled database.
    db: Db,
    /// Tree for row data.
    rows: Tree,
}

impl TableStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with(sled::Config::new().path(path))
    }

    /// Open a store from a sled configuration.
    pub fn open_with(config: sled::Config) -> Result<Self, Error> {
        let db = config.open()?;
        let rows = db.open_tree(ROWS_TREE)?;
        Ok(Self { db, rows })
    }

    /// Open an in-memory store that is discarded on drop.
    pub fn temporary() -> Result<Self, Error> {
        Self::open_with(sled::Config::new().temporary(true))
    }

    /// Insert or replace a full row.
    pub fn insert(
        &self,
        table: &str,
        slot: StageSlot,
        key: RowKey,
        row: &Row,
    ) -> Result<(), Error> {
        let key_bytes = data_key(table, slot, &key);
        let value_bytes = row.to_bytes()?;
        self.rows.insert(key_bytes, value_bytes)?;
        Ok(())
    }

    /// Insert the same row into both stages of a versioned table
    /// (a record that has been published).
    pub fn insert_staged(&self, table: &str, key: RowKey, row: &Row) -> Result<(), Error> {
        self.insert(table, StageSlot::Staged(Stage::Draft), key, row)?;
        self.insert(table, StageSlot::Staged(Stage::Live), key, row)?;
        Ok(())
    }

    /// Get a row by key.
    pub fn get(&self, table: &str, slot: StageSlot, key: &RowKey) -> Result<Option<Row>, Error> {
        let key_bytes = data_key(table, slot, key);
        match self.rows.get(key_bytes)? {
            Some(bytes) => Ok(Some(Row::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Check whether a row exists.
    pub fn contains(&self, table: &str, slot: StageSlot, key: &RowKey) -> Result<bool, Error> {
        let key_bytes = data_key(table, slot, key);
        Ok(self.rows.contains_key(key_bytes)?)
    }

    /// Scan all rows of a table in one slot.
    pub fn scan(
        &self,
        table: &str,
        slot: StageSlot,
    ) -> impl Iterator<Item = Result<(RowKey, Row), Error>> + '_ {
        let prefix = slot_prefix(table, slot);
        let prefix_len = prefix.len();

        self.rows.scan_prefix(prefix).map(move |result| {
            let (key_bytes, value_bytes) = result?;
            let key = RowKey::decode(&key_bytes[prefix_len..]).ok_or(Error::InvalidKey)?;
            let row = Row::from_bytes(&value_bytes)?;
            Ok((key, row))
        })
    }

    /// Write a single column of a single row.
    ///
    /// The row is decoded, the one column set, and the row re-encoded in
    /// place. Nothing else about the row changes.
    pub fn set_column(
        &self,
        table: &str,
        slot: StageSlot,
        key: &RowKey,
        column: &str,
        value: Value,
    ) -> Result<(), Error> {
        self.apply(std::slice::from_ref(&ColumnUpdate {
            table: table.to_string(),
            slot,
            key: *key,
            column: column.to_string(),
            value,
        }))
    }

    /// Apply a batch of column updates atomically.
    ///
    /// Either every update in the batch is applied or none is. A missing
    /// row aborts the whole batch.
    pub fn apply(&self, updates: &[ColumnUpdate]) -> Result<(), Error> {
        if updates.is_empty() {
            return Ok(());
        }

        let result = self.rows.transaction(|tx| {
            for update in updates {
                let key_bytes = data_key(&update.table, update.slot, &update.key);
                let bytes = tx
                    .get(&key_bytes)?
                    .ok_or(ConflictableTransactionError::Abort(Error::NotFound))?;
                let mut row =
                    Row::from_bytes(&bytes).map_err(ConflictableTransactionError::Abort)?;
                row.set(&update.column, update.value.clone());
                let encoded = row
                    .to_bytes()
                    .map_err(ConflictableTransactionError::Abort)?;
                tx.insert(key_bytes, encoded)?;
            }
            Ok(())
        });

        match result {
            Ok(()) => {
                debug!(updates = updates.len(), "Applied column update batch");
                Ok(())
            }
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => Err(Error::Storage(e)),
        }
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }
}
