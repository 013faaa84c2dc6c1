//! # Record Collections
//!
//! A collection is one persisted array of records, read and written whole.
//!
//! - **JSON file**: the array lives in a single file. The file (and its
//!   directory) is created as `[]` on first access, and content that is not a
//!   JSON array is reset to `[]`.
//! - **Memory**: an in-process array, for tests and in-process gateways.

use crate::errors::StoreResult;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Whole-array persistence for one resource.
pub trait Collection<T>: Send + Sync {
    fn load_collection(&self) -> StoreResult<Vec<T>>;

    fn save_collection(&self, records: &[T]) -> StoreResult<()>;
}

/// Collection stored as a pretty-printed JSON array on disk.
#[derive(Debug)]
pub struct JsonFileCollection<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileCollection<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> StoreResult<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, "[]")?;
        tracing::debug!(path = ?self.path, "Created empty collection");
        Ok(())
    }
}

impl<T> Collection<T> for JsonFileCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load_collection(&self) -> StoreResult<Vec<T>> {
        self.ensure_exists()?;
        let raw = fs::read(&self.path)?;

        let items = match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            _ => {
                tracing::warn!(path = ?self.path, "Collection is not a JSON array, resetting to []");
                fs::write(&self.path, "[]")?;
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = ?self.path, index, error = %e, "Skipping unreadable record");
                }
            }
        }

        Ok(records)
    }

    fn save_collection(&self, records: &[T]) -> StoreResult<()> {
        self.ensure_exists()?;
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Collection held in memory.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    records: Mutex<Vec<T>>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl<T> Collection<T> for MemoryCollection<T>
where
    T: Clone + Send,
{
    fn load_collection(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.lock().clone())
    }

    fn save_collection(&self, records: &[T]) -> StoreResult<()> {
        *self.records.lock() = records.to_vec();
        Ok(())
    }
}
