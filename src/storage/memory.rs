//! In-memory record store.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use serde_json::Value;

use crate::storage::{Record, Storage, StorageError, PRIMARY_KEY};

/// Hidden soft-delete marker.
const DELETED_FIELD: &str = "_isDeleted";

#[derive(Debug, Default)]
struct Collection {
    next_id: i64,
    rows: Vec<Record>,
}

impl Collection {
    fn live_mut(&mut self, key: &Value) -> Option<&mut Record> {
        self.rows
            .iter_mut()
            .find(|row| !is_deleted(row) && row.get(PRIMARY_KEY).is_some_and(|v| loose_eq(v, key)))
    }
}

/// Thread-safe store backed by a `DashMap` of collections.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    collections: DashMap<String, Collection>,
    open: AtomicBool,
}

impl MemoryStorage {
    /// Create a closed store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and open a store.
    pub fn opened() -> Self {
        let storage = Self::new();
        storage.open.store(true, Ordering::SeqCst);
        storage
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.open.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Closed)
        }
    }
}

impl Storage for MemoryStorage {
    fn open(&self) -> Result<(), StorageError> {
        self.open.store(true, Ordering::SeqCst);
        tracing::debug!("memory storage opened");
        Ok(())
    }

    fn close(&self) -> Result<(), StorageError> {
        self.open.store(false, Ordering::SeqCst);
        tracing::debug!("memory storage closed");
        Ok(())
    }

    fn select(
        &self,
        collection: &str,
        filter: &Record,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, StorageError> {
        self.ensure_open()?;
        let Some(collection) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        let rows = collection
            .rows
            .iter()
            .filter(|row| !is_deleted(row) && matches_filter(row, filter))
            .take(limit.unwrap_or(usize::MAX))
            .map(visible)
            .collect();
        Ok(rows)
    }

    fn insert(&self, collection: &str, mut record: Record) -> Result<Record, StorageError> {
        self.ensure_open()?;
        let mut entry = self.collections.entry(collection.to_string()).or_default();

        let key = match record.get(PRIMARY_KEY) {
            Some(key) => {
                if entry.live_mut(key).is_some() {
                    return Err(StorageError::DuplicateKey {
                        collection: collection.to_string(),
                        key: key.to_string(),
                    });
                }
                if let Some(id) = numeric_key(key) {
                    entry.next_id = entry.next_id.max(id);
                }
                key.clone()
            }
            None => loop {
                entry.next_id += 1;
                let candidate = Value::from(entry.next_id);
                if entry.live_mut(&candidate).is_none() {
                    break candidate;
                }
            },
        };

        record.insert(PRIMARY_KEY.to_string(), key);
        record.insert(DELETED_FIELD.to_string(), Value::from(0));
        let stored = visible(&record);
        entry.rows.push(record);
        Ok(stored)
    }

    fn update(&self, collection: &str, record: &Record) -> Result<bool, StorageError> {
        self.ensure_open()?;
        let key = record
            .get(PRIMARY_KEY)
            .ok_or(StorageError::MissingPrimaryKey("update"))?;
        let Some(mut entry) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(row) = entry.live_mut(key) else {
            return Ok(false);
        };
        for (field, value) in record {
            if field == PRIMARY_KEY || field == DELETED_FIELD {
                continue;
            }
            row.insert(field.clone(), value.clone());
        }
        Ok(true)
    }

    fn delete(&self, collection: &str, record: &Record) -> Result<bool, StorageError> {
        self.ensure_open()?;
        let key = record
            .get(PRIMARY_KEY)
            .ok_or(StorageError::MissingPrimaryKey("delete"))?;
        let Some(mut entry) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        match entry.live_mut(key) {
            Some(row) => {
                row.insert(DELETED_FIELD.to_string(), Value::from(1));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn numeric_key(key: &Value) -> Option<i64> {
    key.as_i64().or_else(|| key.as_str()?.parse().ok())
}

fn is_deleted(row: &Record) -> bool {
    row.get(DELETED_FIELD)
        .and_then(Value::as_i64)
        .is_some_and(|flag| flag != 0)
}

fn visible(row: &Record) -> Record {
    let mut row = row.clone();
    row.remove(DELETED_FIELD);
    row
}

fn matches_filter(row: &Record, filter: &Record) -> bool {
    filter.iter().all(|(field, wanted)| {
        let Some(actual) = row.get(field) else {
            return false;
        };
        match wanted {
            Value::Array(options) => options.iter().any(|option| loose_eq(actual, option)),
            scalar => loose_eq(actual, scalar),
        }
    })
}

/// Equality that treats `12` and `"12"` as the same key, like SQL did.
fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (scalar_text(a), scalar_text(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}
