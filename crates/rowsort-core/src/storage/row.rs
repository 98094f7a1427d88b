//! Row and value types for stored records.

use crate::error::Error;
use rkyv::{Archive, Deserialize, Serialize};
use std::fmt;

/// Size of a record identifier in bytes (UUID).
pub const RECORD_ID_SIZE: usize = 16;

/// An opaque record identifier (UUID bytes).
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize,
    serde::Serialize, serde::Deserialize,
)]
pub struct RecordId(pub [u8; RECORD_ID_SIZE]);

impl RecordId {
    /// Create a record id from raw bytes.
    pub fn new(bytes: [u8; RECORD_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Generate a new record id (UUID v4 bit pattern).
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        // Counter to ensure uniqueness even with same timestamp
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_nanos() as u64;

        let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

        let mut id = [0u8; RECORD_ID_SIZE];
        id[..8].copy_from_slice(&now.to_le_bytes());
        id[8..16].copy_from_slice(&counter.to_le_bytes());

        // Set UUID version 4 bits
        id[6] = (id[6] & 0x0f) | 0x40;
        id[8] = (id[8] & 0x3f) | 0x80;

        Self(id)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; RECORD_ID_SIZE] {
        &self.0
    }

    /// Decode a record id from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != RECORD_ID_SIZE {
            return None;
        }
        let mut id = [0u8; RECORD_ID_SIZE];
        id.copy_from_slice(bytes);
        Some(Self(id))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format as hex for readability
        let hex: String = self.0.iter().map(|b| format!("{:02x}", b)).collect();
        write!(f, "RecordId({})", hex)
    }
}

/// A scalar value stored in a row column.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value (sort positions, counters).
    Int(i64),
    /// String value.
    String(String),
    /// Reference to another record.
    Id(RecordId),
}

/// A stored row: ordered list of column name/value pairs.
#[derive(Debug, Clone, PartialEq, Default, Archive, Serialize, Deserialize)]
pub struct Row {
    /// Column name/value pairs in insertion order.
    pub fields: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a column (builder style).
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(&name.into(), value);
        self
    }

    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Set a column value, replacing any existing value for the same name.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// Serialize the row to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a row from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}
