//! Concrete key-value stores
//!
//! The mobile app this crate comes from relies on the platform's own household storage, which only has to honour
//! the [`KeyValueStore`](crate::traits::KeyValueStore) contract. The implementations here cover desktop use and tests.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::mock_behaviour::MockBehaviour;
use crate::traits::KeyValueStore;

/// A key-value store that persists its content in a single local JSON file
#[derive(Debug, PartialEq)]
pub struct FileStore {
    backing_file: PathBuf,
    data: HashMap<String, String>,
}

impl FileStore {
    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self{
            backing_file: PathBuf::from(path),
            data,
        })
    }

    /// Initialize an empty store over `path`. Nothing is written until the first `set`
    pub fn new(path: &Path) -> Self {
        Self{
            backing_file: PathBuf::from(path),
            data: HashMap::new(),
        }
    }

    fn save_to_file(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let path = &self.backing_file;
        let file = match std::fs::File::create(path) {
            Err(err) => {
                return Err(format!("Unable to save file {:?}: {}", path, err).into());
            },
            Ok(f) => f,
        };

        serde_json::to_writer(file, &self.data)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        Ok(self.data.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.data.insert(key.to_string(), value.to_string());
        self.save_to_file()
    }
}


/// An in-memory store.
///
/// Clones share the same underlying data, just like two sessions of an app share the same household storage.
/// This makes it easy to simulate an app restart in tests: keep a clone, drop the store, build a new one over the clone. \
/// Its [`MockBehaviour`] can additionally make some operations fail on demand.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, String>>>,
    mock_behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`MockBehaviour`]
    pub fn set_mock_behaviour(&self, behaviour: MockBehaviour) {
        *self.mock_behaviour.lock().unwrap() = behaviour;
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        self.mock_behaviour.lock().unwrap().can_get()?;
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.mock_behaviour.lock().unwrap().can_set()?;
        self.data.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
