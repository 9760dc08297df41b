//! # Storage Layer
//!
//! Persistence is a key-value port: JSON values stored under string keys.
//! The catalog uses a single fixed key for the whole collection and
//! rewrites it wholesale on every mutation, so the port needs nothing
//! fancier than `read` and `write`.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, one `<key>.json` file per key
//!   under a data directory
//! - [`memory::InMemoryStore`]: in-memory storage for testing, no
//!   persistence, fast isolated test execution

use crate::error::Result;
use serde_json::Value;

pub mod fs;
pub mod memory;

/// Abstract interface for persisted JSON values.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`.
    fn write(&mut self, key: &str, value: &Value) -> Result<()>;
}
