use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{DocumentStore, Result, StoreError};

/// Documents persisted as one JSON object on disk.
///
/// The whole collection is held in memory and the file is rewritten after
/// every mutation, so reads never touch the disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Loads the collection at `path`. A missing file is an empty collection.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(JsonFileStore { path, data })
    }

    fn flush(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

impl DocumentStore for JsonFileStore {
    fn put<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(value)?;
        let previous = self.data.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            match previous {
                Some(previous) => self.data.insert(key.to_string(), previous),
                None => self.data.remove(key),
            };
            return Err(e);
        }
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
            Some(value) => {
                if let Err(e) = self.flush() {
                    self.data.insert(key.to_string(), value);
                    return Err(e);
                }
                Ok(Some(serde_json::from_value(value)?))
            }
            None => Ok(None),
        }
    }

    fn list<T>(&self, prefix: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut values = Vec::new();
        for (_, value) in self
            .data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            values.push(serde_json::from_value(value.clone())?);
        }
        Ok(values)
    }
}
