//! Record storage collaborator.
//!
//! # Responsibilities
//! - Define the narrow interface endpoint handlers use to persist records
//! - Provide an in-memory store for tests and standalone runs
//!
//! # Design Decisions
//! - Storage is an explicit dependency handed to the dispatcher, with an
//!   explicit open/close lifecycle instead of a lazily created global
//! - Records are JSON objects keyed by field name; `id` is the primary key
//! - Deletes are soft: records are flagged and hidden from `select`

pub mod memory;

use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStorage;

/// A stored record.
pub type Record = Map<String, Value>;

/// Primary key field.
pub const PRIMARY_KEY: &str = "id";

/// Errors raised by storage backends.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is closed")]
    Closed,

    #[error("no primary key found in {0} document")]
    MissingPrimaryKey(&'static str),

    #[error("duplicate primary key {key} in {collection}")]
    DuplicateKey { collection: String, key: String },

    #[error("invalid record: {0}")]
    Invalid(String),
}

/// Interface consumed by endpoint handlers.
pub trait Storage: Send + Sync {
    /// Make the store ready for use.
    fn open(&self) -> Result<(), StorageError>;

    /// Release the store; later calls fail with [`StorageError::Closed`].
    fn close(&self) -> Result<(), StorageError>;

    /// Records whose fields equal every entry of `filter`.
    ///
    /// An array in `filter` matches any of its elements. `None` means no limit.
    fn select(
        &self,
        collection: &str,
        filter: &Record,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, StorageError>;

    /// Store `record`, generating a primary key when absent.
    fn insert(&self, collection: &str, record: Record) -> Result<Record, StorageError>;

    /// Overwrite the fields of the record with the same primary key.
    fn update(&self, collection: &str, record: &Record) -> Result<bool, StorageError>;

    /// Soft-delete the record with the same primary key.
    fn delete(&self, collection: &str, record: &Record) -> Result<bool, StorageError>;
}
