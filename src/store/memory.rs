/*!
 * In-memory storage backend.
 *
 * Clones share the same map, so a test can keep a handle to inspect or
 * tamper with what the store wrote, or reopen a second store on the same data.
 */

use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ModifyFn, StorageBackend};

/// Volatile key/value storage
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn modify(&self, key: &str, f: &mut ModifyFn<'_>) -> Result<()> {
        // Hold the lock across the whole read-modify-write
        let mut entries = self.entries.lock();
        let current = entries.get(key).cloned();
        if let Some(next) = f(current)? {
            entries.insert(key.to_string(), next);
        }
        Ok(())
    }
}
