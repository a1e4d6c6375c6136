use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

mod json_file;
mod memory;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unsupported store connection string `{0}` (expected memory:// or file://<path>)")]
    UnsupportedUri(String),
    #[error("store file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A collection of JSON documents addressed by string keys.
/// Implementations are expected to be fast enough to call from the
/// state loop without offloading to a blocking pool.
pub trait DocumentStore {
    fn put<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize;
    fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned;
    fn delete<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned;
    fn list<T>(&self, prefix: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned;
}

/// Store selected by a connection string.
pub enum Store {
    Memory(InMemoryStore),
    JsonFile(JsonFileStore),
}

impl Store {
    /// Opens the store named by `uri`: `memory://` or `file://<path>`.
    pub fn open(uri: &str) -> Result<Self> {
        if uri == "memory://" || uri == "memory:" {
            Ok(Store::Memory(InMemoryStore::new()))
        } else if let Some(path) = uri.strip_prefix("file://") {
            if path.is_empty() {
                return Err(StoreError::UnsupportedUri(uri.to_string()));
            }
            Ok(Store::JsonFile(JsonFileStore::open(path)?))
        } else {
            Err(StoreError::UnsupportedUri(uri.to_string()))
        }
    }
}

impl DocumentStore for Store {
    fn put<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        match self {
            Store::Memory(store) => store.put(key, value),
            Store::JsonFile(store) => store.put(key, value),
        }
    }

    fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self {
            Store::Memory(store) => store.get(key),
            Store::JsonFile(store) => store.get(key),
        }
    }

    fn delete<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self {
            Store::Memory(store) => store.delete(key),
            Store::JsonFile(store) => store.delete(key),
        }
    }

    fn list<T>(&self, prefix: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        match self {
            Store::Memory(store) => store.list(prefix),
            Store::JsonFile(store) => store.list(prefix),
        }
    }
}
