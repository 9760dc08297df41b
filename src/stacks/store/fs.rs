use super::KeyValueStore;
use crate::error::{Result, StacksError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed store: each key lives in `<root>/<key>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(StacksError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(StacksError::Io)?;
        let value = serde_json::from_str(&content).map_err(StacksError::Serialization)?;
        Ok(Some(value))
    }

    fn write(&mut self, key: &str, value: &Value) -> Result<()> {
        self.ensure_root()?;
        let content = serde_json::to_string_pretty(value).map_err(StacksError::Serialization)?;
        fs::write(self.key_path(key), content).map_err(StacksError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(store.read("library-books").unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("data"));
        let value = json!([{"title": "Dune"}]);

        store.write("library-books", &value).unwrap();
        assert_eq!(store.read("library-books").unwrap(), Some(value));
        assert!(dir.path().join("data").join("library-books.json").exists());
    }

    #[test]
    fn keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.write("a", &json!(1)).unwrap();
        store.write("b", &json!(2)).unwrap();
        assert_eq!(store.read("a").unwrap(), Some(json!(1)));
        assert_eq!(store.read("b").unwrap(), Some(json!(2)));
    }
}
