/*!
 * Inventory manager for item-level mutations.
 *
 * This module handles:
 * - Creating sessions from user input
 * - Recording scanned barcodes
 * - Removing items by id, or by timestamp for legacy items
 *
 * Every mutation works on a copy of the caller's snapshot and goes through
 * [`SessionStore::save_session`] before the updated session is returned.
 */

use log::{debug, info, warn};

use crate::capture::normalize_barcode;
use crate::errors::{InventoryError, InventoryResult};
use crate::store::SessionStore;

use super::matching::MatchStrategy;
use super::models::{Coleccion, InventoryItem, InventorySession, Sede};
use super::validate_session_name;

/// Applies item mutations to sessions and persists them
pub struct InventoryManager {
    /// Store every mutation is written through
    store: SessionStore,
    /// Order in which match strategies are tried on removal
    precedence: Vec<MatchStrategy>,
}

impl InventoryManager {
    /// Create a manager over `store` with the default match precedence
    pub fn new(store: SessionStore) -> Self {
        Self::with_precedence(store, super::matching::DEFAULT_PRECEDENCE.to_vec())
    }

    /// Create a manager with an explicit match precedence
    pub fn with_precedence(store: SessionStore, precedence: Vec<MatchStrategy>) -> Self {
        Self { store, precedence }
    }

    /// Get the underlying store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Give the store back, e.g. to close it
    pub fn into_store(self) -> SessionStore {
        self.store
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Create a session after validating its name
    pub fn create_session(
        &self,
        name: &str,
        sede: Sede,
        coleccion: Coleccion,
    ) -> InventoryResult<InventorySession> {
        let name = validate_session_name(name)?;
        self.store.create_session(&name, sede, coleccion)
    }

    /// All sessions, most recently updated first
    pub fn list_recent(&self) -> Vec<InventorySession> {
        let mut sessions = self.store.list_sessions();
        super::models::sort_by_recent(&mut sessions);
        sessions
    }

    // =========================================================================
    // Adding Items
    // =========================================================================

    /// Record one barcode at the end of `session`
    pub fn add_item(
        &self,
        session: &InventorySession,
        barcode: &str,
    ) -> InventoryResult<InventorySession> {
        let barcode = normalize_barcode(barcode)
            .ok_or_else(|| InventoryError::Validation("Barcode cannot be empty".to_string()))?;

        let now = self.store.clock().now_millis();
        let item = InventoryItem::new(self.store.ids().new_id(), barcode, now);

        let mut updated = session.clone();
        updated.push_item(item, now);
        self.store.save_session(&updated)?;

        debug!(
            "Added '{}' to session {} ({} items)",
            updated.items.last().map(|i| i.barcode.as_str()).unwrap_or_default(),
            updated.short_id(),
            updated.item_count()
        );
        Ok(updated)
    }

    /// Record several barcodes in order, skipping blank ones
    pub fn add_items<S: AsRef<str>>(
        &self,
        session: &InventorySession,
        barcodes: &[S],
    ) -> InventoryResult<InventorySession> {
        let mut current = session.clone();
        let mut added = 0;

        for raw in barcodes {
            match self.add_item(&current, raw.as_ref()) {
                Ok(updated) => {
                    current = updated;
                    added += 1;
                }
                Err(InventoryError::Validation(msg)) => {
                    warn!("Skipping barcode {:?}: {}", raw.as_ref(), msg);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Added {} of {} barcodes to session {}", added, barcodes.len(), current.short_id());
        Ok(current)
    }

    // =========================================================================
    // Removing Items
    // =========================================================================

    /// Remove the item `target` refers to.
    ///
    /// When nothing matches, the session is returned as given and storage is
    /// not written.
    pub fn remove_item(
        &self,
        session: &InventorySession,
        target: &InventoryItem,
    ) -> InventoryResult<InventorySession> {
        let mut updated = session.clone();
        let now = self.store.clock().now_millis();

        match updated.remove_item_with(target, &self.precedence, now) {
            Some(removed) => {
                self.store.save_session(&updated)?;
                info!(
                    "Removed '{}' from session {} ({} items left)",
                    removed.barcode,
                    updated.short_id(),
                    updated.item_count()
                );
                Ok(updated)
            }
            None => {
                debug!("No item in session {} matches the removal target", session.short_id());
                Ok(session.clone())
            }
        }
    }

    /// Remove the item with the given id
    pub fn remove_item_by_id(
        &self,
        session: &InventorySession,
        item_id: &str,
    ) -> InventoryResult<InventorySession> {
        if item_id.is_empty() {
            return Err(InventoryError::Validation("Item id cannot be empty".to_string()));
        }
        let target = session
            .items
            .iter()
            .find(|item| item.stable_id() == Some(item_id))
            .cloned()
            .unwrap_or_else(|| InventoryItem::new(item_id, "", 0));
        self.remove_item(session, &target)
    }

    /// Remove the first id-less item recorded at `timestamp`
    pub fn remove_item_by_timestamp(
        &self,
        session: &InventorySession,
        timestamp: i64,
    ) -> InventoryResult<InventorySession> {
        self.remove_item(session, &InventoryItem::legacy("", timestamp))
    }
}
