//! In-memory entity collection backed by a JSON file
//!
//! Each entity kind lives in its own file as `{"items": [...]}`. The whole
//! file is loaded into a `RwLock<HashMap>` and written back atomically on
//! save. Entity-specific queries are added as inherent impls in the sibling
//! modules (`cards.rs`, `series.rs`, ...).

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::CycleError;

use super::file_io::{read_json, write_json_atomic};

/// An entity that can be stored in a [`Collection`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + ToString;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct CollectionFile<T> {
    #[serde(default)]
    items: Vec<T>,
}

impl<T> Default for CollectionFile<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// A set of records keyed by id
pub struct Collection<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<T::Id, T>>, CycleError> {
        self.data
            .read()
            .map_err(|e| CycleError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<T::Id, T>>, CycleError> {
        self.data
            .write()
            .map_err(|e| CycleError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the in-memory contents with the file on disk
    pub fn load(&self) -> Result<(), CycleError> {
        let file: CollectionFile<T> = read_json(&self.path)?;

        let mut data = self.write()?;
        data.clear();
        for item in file.items {
            data.insert(item.id(), item);
        }

        Ok(())
    }

    /// Write every record to disk, oldest first
    pub fn save(&self) -> Result<(), CycleError> {
        let file = CollectionFile {
            items: self.get_all()?,
        };
        write_json_atomic(&self.path, &file)
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, CycleError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All records ordered by creation time, ties broken by id
    pub fn get_all(&self) -> Result<Vec<T>, CycleError> {
        let mut items: Vec<T> = self.read()?.values().cloned().collect();
        items.sort_by_cached_key(|item| (item.created_at(), item.id().to_string()));
        Ok(items)
    }

    /// Records matching `predicate`, in creation order
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<T>, CycleError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.get_all()?.into_iter().filter(|item| predicate(item)).collect())
    }

    /// First record (in creation order) matching `predicate`
    pub fn find<F>(&self, predicate: F) -> Result<Option<T>, CycleError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.get_all()?.into_iter().find(|item| predicate(item)))
    }

    pub fn upsert(&self, item: T) -> Result<(), CycleError> {
        self.write()?.insert(item.id(), item);
        Ok(())
    }

    pub fn upsert_many(&self, items: Vec<T>) -> Result<(), CycleError> {
        let mut data = self.write()?;
        for item in items {
            data.insert(item.id(), item);
        }
        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn remove(&self, id: T::Id) -> Result<Option<T>, CycleError> {
        Ok(self.write()?.remove(&id))
    }

    pub fn count(&self) -> Result<usize, CycleError> {
        Ok(self.read()?.len())
    }
}
