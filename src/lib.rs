/*!
 * # Bibliotrack - library inventory logging
 *
 * A Rust library for recording library inventories: an operator opens a
 * session for a site (sede) and collection type (colección), scans the
 * barcode of every item on the shelf, and exports the result.
 *
 * ## Features
 *
 * - Durable sessions stored in SQLite, a checksummed JSON file, or memory
 * - Barcode capture from keyboard-wedge scanners or any line input
 * - Removal of items by id, with a timestamp fallback for legacy items
 * - CSV export, email and WhatsApp share links
 * - AI-written summary reports via Gemini
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `inventory`: Session and item models, ids, matching and the item manager
 * - `store`: The session store and its storage backends:
 *   - `store::memory`: Volatile backend for tests and ephemeral runs
 *   - `store::sqlite`: SQLite key/value backend
 *   - `store::json_file`: Checksummed JSON file backend
 * - `database`: SQLite connection and schema management
 * - `capture`: Barcode normalization, scan loop and device acquisition
 * - `export`: CSV and share-link rendering
 * - `report`: Summary report generation
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod capture;
pub mod database;
pub mod errors;
pub mod export;
pub mod inventory;
pub mod report;
pub mod store;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, InventoryError, InventoryResult};
pub use inventory::{Coleccion, InventoryItem, InventoryManager, InventorySession, Sede};
pub use store::{SessionStore, StorageBackend};
