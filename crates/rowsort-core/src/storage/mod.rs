//! Row storage: keys, rows, and the sled-backed store.

mod key;
mod row;
mod store;

pub use key::{RowKey, Stage, StageSlot};
pub use row::{RecordId, Row, Value, RECORD_ID_SIZE};
pub use store::{ColumnUpdate, TableStore};
