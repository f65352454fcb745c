/*!
 * Session store: durable CRUD over the inventory session collection.
 *
 * The whole collection is kept as one JSON array under a single key of an
 * injected [`StorageBackend`]. Every mutation rewrites that blob before
 * returning. Reads are lenient: a missing, unreadable or corrupt blob is
 * reported as an empty collection instead of an error.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::errors::InventoryResult;
use crate::inventory::ids::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::inventory::models::{Coleccion, InventorySession, Sede};

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// Key under which the session collection is stored
pub const SESSIONS_KEY: &str = "BIBLIOTRACK_SESSIONS";

/// Closure used by [`StorageBackend::modify`]. Receives the current value and
/// returns the value to write, or `None` to leave storage untouched.
pub type ModifyFn<'a> = dyn FnMut(Option<String>) -> Result<Option<String>> + 'a;

/// A keyed text storage medium
pub trait StorageBackend: Send {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Read the value stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Read, transform and write `key` as one step.
    ///
    /// Backends that can be shared with other writers override this to make
    /// the sequence atomic.
    fn modify(&self, key: &str, f: &mut ModifyFn<'_>) -> Result<()> {
        let current = self.read(key)?;
        if let Some(next) = f(current)? {
            self.write(key, &next)?;
        }
        Ok(())
    }

    /// Flush and release the medium
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Decode a stored blob into sessions
pub fn decode_sessions(raw: Option<&str>) -> Result<Vec<InventorySession>> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).context("Failed to parse stored sessions"),
    }
}

/// Decode a stored blob, treating anything unparseable as empty
fn decode_lenient(raw: Option<&str>) -> Vec<InventorySession> {
    match decode_sessions(raw) {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!("Stored sessions are unreadable, treating as empty: {:#}", e);
            Vec::new()
        }
    }
}

fn encode_sessions(sessions: &[InventorySession]) -> Result<String> {
    serde_json::to_string(sessions).context("Failed to serialize sessions")
}

/// Durable collection of inventory sessions
pub struct SessionStore {
    /// Storage medium
    backend: Box<dyn StorageBackend>,
    /// Identifier source for new sessions and items
    ids: Arc<dyn IdGenerator>,
    /// Time source for new sessions and items
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Open a store over `backend` with random ids and the wall clock
    pub fn open(backend: impl StorageBackend + 'static) -> Self {
        Self::open_boxed(Box::new(backend))
    }

    /// Open a store over an already boxed backend
    pub fn open_boxed(backend: Box<dyn StorageBackend>) -> Self {
        Self::with_collaborators(backend, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Open a store with explicit id and clock collaborators
    pub fn with_collaborators(
        backend: Box<dyn StorageBackend>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        debug!("Opening session store on {} backend", backend.name());
        Self { backend, ids, clock }
    }

    /// Open a store backed by a fresh in-memory medium
    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new())
    }

    /// Name of the backing medium
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Identifier source shared with item mutations
    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Time source shared with item mutations
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// All persisted sessions in storage order. Never fails.
    pub fn list_sessions(&self) -> Vec<InventorySession> {
        match self.backend.read(SESSIONS_KEY) {
            Ok(raw) => decode_lenient(raw.as_deref()),
            Err(e) => {
                warn!("Failed to read sessions from {} backend: {:#}", self.backend.name(), e);
                Vec::new()
            }
        }
    }

    /// Look up one session by id
    pub fn get_session(&self, session_id: &str) -> Option<InventorySession> {
        self.list_sessions().into_iter().find(|s| s.id == session_id)
    }

    /// Create and persist an empty session.
    ///
    /// The name is stored as given; blank names are rejected by callers
    /// (see [`crate::inventory::validate_session_name`]).
    pub fn create_session(
        &self,
        name: &str,
        sede: Sede,
        coleccion: Coleccion,
    ) -> InventoryResult<InventorySession> {
        let session = InventorySession::new(
            self.ids.new_id(),
            name,
            sede,
            coleccion,
            self.clock.now_millis(),
        );

        info!(
            "Creating session {} '{}' ({} / {})",
            session.short_id(),
            session.name,
            sede,
            coleccion
        );

        self.save_session(&session)?;
        Ok(session)
    }

    /// Insert or replace a session by id
    pub fn save_session(&self, session: &InventorySession) -> InventoryResult<()> {
        let mut modify = |raw: Option<String>| -> Result<Option<String>> {
            let mut sessions = decode_lenient(raw.as_deref());
            match sessions.iter_mut().find(|s| s.id == session.id) {
                Some(existing) => *existing = session.clone(),
                None => sessions.push(session.clone()),
            }
            Ok(Some(encode_sessions(&sessions)?))
        };

        self.backend.modify(SESSIONS_KEY, &mut modify)?;
        debug!(
            "Saved session {} ({} items)",
            session.short_id(),
            session.item_count()
        );
        Ok(())
    }

    /// Remove a session by id. Unknown ids are ignored.
    pub fn delete_session(&self, session_id: &str) -> InventoryResult<()> {
        let mut removed = false;
        let mut modify = |raw: Option<String>| -> Result<Option<String>> {
            let mut sessions = decode_lenient(raw.as_deref());
            let before = sessions.len();
            sessions.retain(|s| s.id != session_id);
            removed = sessions.len() != before;
            if removed {
                Ok(Some(encode_sessions(&sessions)?))
            } else {
                Ok(None)
            }
        };

        self.backend.modify(SESSIONS_KEY, &mut modify)?;

        if removed {
            info!("Deleted session {}", session_id);
        } else {
            debug!("Delete ignored, no session {}", session_id);
        }
        Ok(())
    }

    /// Flush and release the backend
    pub fn close(mut self) -> InventoryResult<()> {
        debug!("Closing session store on {} backend", self.backend.name());
        self.backend.close()?;
        Ok(())
    }
}
