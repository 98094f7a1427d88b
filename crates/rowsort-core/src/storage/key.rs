//! Row key and storage key encoding.
//!
//! Physical key format: `[table bytes][0x00][stage byte][row key bytes]`.
//! The null separator keeps table namespaces disjoint; the stage byte keeps
//! draft and live representations of the same row in separate slots.

use super::row::{RecordId, RECORD_ID_SIZE};

/// Key tag for a row keyed by a single record id.
const TAG_ID: u8 = 1;

/// Key tag for a row keyed by a (parent, child) pair.
const TAG_PAIR: u8 = 2;

/// A versioned record's storage variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    /// Working/draft stage.
    Draft,
    /// Published/live stage.
    Live,
}

/// The storage slot a row lives in.
///
/// Non-versioned tables have a single unstaged slot; versioned tables keep
/// one slot per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSlot {
    /// Single slot for non-versioned tables.
    Unstaged,
    /// Stage-scoped slot for versioned tables.
    Staged(Stage),
}

impl StageSlot {
    /// Pick the slot for a resolved target: stage-aware targets write to the
    /// supplied stage, everything else to the unstaged slot.
    pub fn for_target(stage_aware: bool, stage: Stage) -> Self {
        if stage_aware {
            Self::Staged(stage)
        } else {
            Self::Unstaged
        }
    }

    /// Encode the slot as a key byte.
    pub(crate) fn byte(self) -> u8 {
        match self {
            Self::Unstaged => 0,
            Self::Staged(Stage::Draft) => 1,
            Self::Staged(Stage::Live) => 2,
        }
    }
}

/// How a physical row is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Row keyed by its own record id.
    Id(RecordId),
    /// Join-table row keyed by the (parent, child) membership pair.
    Pair(RecordId, RecordId),
}

impl RowKey {
    /// Encode the row key to bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Id(id) => {
                let mut buf = Vec::with_capacity(1 + RECORD_ID_SIZE);
                buf.push(TAG_ID);
                buf.extend_from_slice(id.as_bytes());
                buf
            }
            Self::Pair(parent, child) => {
                let mut buf = Vec::with_capacity(1 + 2 * RECORD_ID_SIZE);
                buf.push(TAG_PAIR);
                buf.extend_from_slice(parent.as_bytes());
                buf.extend_from_slice(child.as_bytes());
                buf
            }
        }
    }

    /// Decode a row key from bytes.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes.first()? {
            &TAG_ID if bytes.len() == 1 + RECORD_ID_SIZE => {
                Some(Self::Id(RecordId::from_slice(&bytes[1..])?))
            }
            &TAG_PAIR if bytes.len() == 1 + 2 * RECORD_ID_SIZE => {
                let parent = RecordId::from_slice(&bytes[1..1 + RECORD_ID_SIZE])?;
                let child = RecordId::from_slice(&bytes[1 + RECORD_ID_SIZE..])?;
                Some(Self::Pair(parent, child))
            }
            _ => None,
        }
    }
}

/// Build the physical storage key for a row.
pub(crate) fn data_key(table: &str, slot: StageSlot, key: &RowKey) -> Vec<u8> {
    let row_key = key.encode();
    let mut buf = Vec::with_capacity(table.len() + 2 + row_key.len());
    buf.extend_from_slice(table.as_bytes());
    buf.push(0); // Null separator
    buf.push(slot.byte());
    buf.extend_from_slice(&row_key);
    buf
}

/// Build the scan prefix for all rows of a table in one slot.
pub(crate) fn slot_prefix(table: &str, slot: StageSlot) -> Vec<u8> {
    let mut buf = Vec::with_capacity(table.len() + 2);
    buf.extend_from_slice(table.as_bytes());
    buf.push(0); // Null separator
    buf.push(slot.byte());
    buf
}
