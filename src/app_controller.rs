use anyhow::Result;
use log::{debug, info, warn};
use std::io::BufRead;
use std::path::Path;

use crate::app_config::{Config, StorageBackendKind, StorageConfig};
use crate::capture::{ScanFeedback, ScanOutcome, Scanner, SilentFeedback, TerminalBell};
use crate::database::DatabaseConnection;
use crate::errors::AppError;
use crate::export;
use crate::inventory::{Coleccion, InventoryManager, InventorySession, Sede};
use crate::report::ReportService;
use crate::store::{JsonFileBackend, MemoryBackend, SessionStore, SqliteBackend, StorageBackend};

// @module: Application controller for inventory commands

/// How a session is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// CSV sheet
    Csv,
    /// `mailto:` link
    Email,
    /// WhatsApp share link
    Share,
}

/// Which item a removal refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Item with this id
    ItemId(String),
    /// Id-less item recorded at this timestamp
    Timestamp(i64),
}

/// Open the storage backend selected by `storage`
pub fn open_backend(storage: &StorageConfig) -> Result<Box<dyn StorageBackend>> {
    let backend: Box<dyn StorageBackend> = match storage.backend {
        StorageBackendKind::Memory => Box::new(MemoryBackend::new()),
        StorageBackendKind::Sqlite => {
            let path = DatabaseConnection::database_path_in(&storage.resolved_data_dir()?);
            Box::new(SqliteBackend::open(path)?)
        }
        StorageBackendKind::JsonFile => Box::new(JsonFileBackend::open(storage.resolved_data_dir()?)?),
    };
    debug!("Using {} storage backend", backend.name());
    Ok(backend)
}

/// Main application controller for inventory sessions
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Item mutations and the store behind them
    manager: InventoryManager,
}

impl Controller {
    /// Create a controller over volatile storage with default configuration
    pub fn new_for_test() -> Self {
        Self::with_store(Config::default(), SessionStore::in_memory())
    }

    // @method: Create a new controller, opening the configured backend
    pub fn with_config(config: Config) -> Result<Self> {
        let backend = open_backend(&config.storage)?;
        Ok(Self::with_store(config, SessionStore::open_boxed(backend)))
    }

    /// Create a controller over an already opened store
    pub fn with_store(config: Config, store: SessionStore) -> Self {
        Self {
            config,
            manager: InventoryManager::new(store),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Item manager
    pub fn manager(&self) -> &InventoryManager {
        &self.manager
    }

    /// Find a session by full id or by a unique id prefix
    pub fn resolve_session(&self, id_or_prefix: &str) -> Result<InventorySession, AppError> {
        let wanted = id_or_prefix.trim();
        if wanted.is_empty() {
            return Err(AppError::SessionNotFound(id_or_prefix.to_string()));
        }

        let sessions = self.manager.store().list_sessions();
        if let Some(exact) = sessions.iter().find(|s| s.id == wanted) {
            return Ok(exact.clone());
        }

        let mut matches: Vec<InventorySession> =
            sessions.into_iter().filter(|s| s.id.starts_with(wanted)).collect();
        match matches.len() {
            0 => Err(AppError::SessionNotFound(wanted.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(AppError::AmbiguousSession {
                prefix: wanted.to_string(),
                matches: n,
            }),
        }
    }

    /// Create a session, falling back to configured defaults for sede and coleccion
    pub fn create_session(
        &self,
        name: &str,
        sede: Option<Sede>,
        coleccion: Option<Coleccion>,
    ) -> Result<InventorySession, AppError> {
        let sede = sede.unwrap_or(self.config.defaults.sede);
        let coleccion = coleccion.unwrap_or(self.config.defaults.coleccion);
        Ok(self.manager.create_session(name, sede, coleccion)?)
    }

    /// Sessions, most recently updated first
    pub fn list_sessions(&self) -> Vec<InventorySession> {
        self.manager.list_recent()
    }

    /// Record typed barcodes
    pub fn add_barcodes(&self, session_id: &str, barcodes: &[String]) -> Result<InventorySession, AppError> {
        let session = self.resolve_session(session_id)?;
        Ok(self.manager.add_items(&session, barcodes)?)
    }

    /// Record every line of `input` as a scan
    pub fn scan<R: BufRead>(&self, session_id: &str, input: R) -> Result<ScanOutcome, AppError> {
        let session = self.resolve_session(session_id)?;
        info!("Scanning into {} (one barcode per line, EOF to finish)", session);

        let feedback: Box<dyn ScanFeedback> = if self.config.capture.bell {
            Box::new(TerminalBell)
        } else {
            Box::new(SilentFeedback)
        };
        Ok(Scanner::new(&self.manager, feedback).run(&session, input)?)
    }

    /// Remove one item. The flag tells whether anything matched.
    pub fn remove_item(
        &self,
        session_id: &str,
        target: &RemoveTarget,
    ) -> Result<(InventorySession, bool), AppError> {
        let session = self.resolve_session(session_id)?;
        let updated = match target {
            RemoveTarget::ItemId(id) => self.manager.remove_item_by_id(&session, id)?,
            RemoveTarget::Timestamp(ts) => self.manager.remove_item_by_timestamp(&session, *ts)?,
        };

        let removed = updated.item_count() < session.item_count();
        if !removed {
            warn!("No item matching {:?} in session {}", target, session.short_id());
        }
        Ok((updated, removed))
    }

    /// Delete a session and return what was deleted
    pub fn delete_session(&self, session_id: &str) -> Result<InventorySession, AppError> {
        let session = self.resolve_session(session_id)?;
        self.manager.store().delete_session(&session.id)?;
        Ok(session)
    }

    /// Export a session. CSV goes to `output` when given; otherwise the text is returned.
    pub fn export(
        &self,
        session_id: &str,
        format: ExportFormat,
        output: Option<&Path>,
    ) -> Result<Option<String>, AppError> {
        let session = self.resolve_session(session_id)?;

        let text = match format {
            ExportFormat::Csv => {
                if let Some(path) = output {
                    export::write_csv(&session, path).map_err(|e| AppError::File(format!("{:#}", e)))?;
                    return Ok(None);
                }
                export::to_csv(&session)?
            }
            ExportFormat::Email => export::email_link(&session)?,
            ExportFormat::Share => export::share_link(&session),
        };

        if let Some(path) = output {
            std::fs::write(path, &text)?;
            return Ok(None);
        }
        Ok(Some(text))
    }

    /// AI summary of a session; falls back to a fixed message on failure
    pub async fn report(&self, session_id: &str) -> Result<String, AppError> {
        let session = self.resolve_session(session_id)?;
        let service = ReportService::from_config(&self.config.report);
        Ok(service.generate(&session).await)
    }

    /// Flush and release storage
    pub fn close(self) -> Result<(), AppError> {
        self.manager.into_store().close()?;
        Ok(())
    }
}
