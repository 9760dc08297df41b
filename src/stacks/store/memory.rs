use super::KeyValueStore;
use crate::error::Result;
use serde_json::Value;
use std::collections::HashMap;

/// In-memory store for tests. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    values: HashMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }
}
