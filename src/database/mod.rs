/*!
 * Database module for persistent storage of inventory sessions.
 *
 * This module provides SQLite-based persistence for the key/value table
 * that backs the session store.
 */

pub mod schema;
pub mod connection;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
