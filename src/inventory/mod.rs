/*!
 * Inventory core: sessions, items and the rules for mutating them.
 *
 * This module handles:
 * - The persisted session and item models
 * - Id and clock collaborators
 * - Matching items for removal, including legacy items without ids
 * - Adding and removing items through the session store
 */

pub mod ids;
pub mod manager;
pub mod matching;
pub mod models;

pub use ids::{Clock, IdGenerator, ManualClock, SequentialIdGenerator, SystemClock, TimeRandomGenerator, UuidGenerator};
pub use manager::InventoryManager;
pub use matching::{MatchStrategy, DEFAULT_PRECEDENCE};
pub use models::{Coleccion, InventoryItem, InventorySession, Sede};

use crate::errors::{InventoryError, InventoryResult};

/// Check a session name typed by the user and return it trimmed
pub fn validate_session_name(name: &str) -> InventoryResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::Validation("Session name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
