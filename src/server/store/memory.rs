use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{DocumentStore, Result};

/// Documents kept in an ordered map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: BTreeMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            data: BTreeMap::new(),
        }
    }
}

impl DocumentStore for InMemoryStore {
    fn put<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.data.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    fn delete<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.data.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn list<T>(&self, prefix: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        Ok(self
            .data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| serde_json::from_value(v.clone()))
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
