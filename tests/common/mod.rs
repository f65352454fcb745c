/*!
 * Common test utilities for the bibliotrack test suite
 */

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tempfile::TempDir;

use bibliotrack::inventory::{InventoryManager, ManualClock, SequentialIdGenerator};
use bibliotrack::store::{MemoryBackend, SessionStore, StorageBackend};

/// Route library logs through env_logger; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Store over `backend` with ids `id-1`, `id-2`, ... and a clock starting at 1000 ms
pub fn create_test_store(backend: Box<dyn StorageBackend>) -> (SessionStore, Arc<ManualClock>) {
    init_logging();
    let clock = Arc::new(ManualClock::new(1_000));
    let store = SessionStore::with_collaborators(
        backend,
        Arc::new(SequentialIdGenerator::new("id")),
        clock.clone(),
    );
    (store, clock)
}

/// Manager over a fresh in-memory backend; the backend handle shares its data
pub fn create_test_manager() -> (InventoryManager, Arc<ManualClock>, MemoryBackend) {
    let backend = MemoryBackend::new();
    let (store, clock) = create_test_store(Box::new(backend.clone()));
    (InventoryManager::new(store), clock, backend)
}

/// Backend whose reads succeed with nothing and whose writes always fail
#[derive(Debug, Default)]
pub struct FailingBackend;

impl StorageBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}

/// Backend whose reads always fail
#[derive(Debug, Default)]
pub struct UnreadableBackend;

impl StorageBackend for UnreadableBackend {
    fn name(&self) -> &str {
        "unreadable"
    }

    fn read(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("permission denied"))
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}
