/*!
 * Integration tests for durable storage backends
 */

use anyhow::Result;
use bibliotrack::database::DatabaseConnection;
use bibliotrack::inventory::{Coleccion, InventoryManager, Sede};
use bibliotrack::store::{JsonFileBackend, SessionStore, SqliteBackend, StorageBackend, SESSIONS_KEY};

use crate::common;

/// A session written through one store is visible after reopening the SQLite file
#[test]
fn test_sqliteBackend_reopen_shouldKeepSessions() -> Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;
    let path = DatabaseConnection::database_path_in(dir.path());

    let saved = {
        let manager = InventoryManager::new(SessionStore::open(SqliteBackend::open(&path)?));
        let session = manager.create_session("Sala 1", Sede::Oriente, Coleccion::Revistas)?;
        let session = manager.add_items(&session, &["R-1", "R-2"])?;
        manager.into_store().close()?;
        session
    };

    let reopened = SessionStore::open(SqliteBackend::open(&path)?);
    assert_eq!(reopened.list_sessions(), vec![saved]);

    Ok(())
}

#[test]
fn test_jsonFileBackend_reopen_shouldKeepSessions() -> Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;

    let saved = {
        let manager = InventoryManager::new(SessionStore::open(JsonFileBackend::open(dir.path())?));
        let session = manager.create_session("Sala 2", Sede::Uraba, Coleccion::Folletos)?;
        let session = manager.add_item(&session, "F-9")?;
        manager.into_store().close()?;
        session
    };

    let reopened = SessionStore::open(JsonFileBackend::open(dir.path())?);
    assert_eq!(reopened.get_session(&saved.id), Some(saved));

    Ok(())
}

#[test]
fn test_jsonFileBackend_withTamperedFile_shouldListEmptyThenAcceptWrites() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let backend = JsonFileBackend::open(dir.path())?;
    let store = SessionStore::open(backend.clone());
    store.create_session("Sala 3", Sede::Medellin, Coleccion::Libros)?;

    let path = backend.path_for(SESSIONS_KEY);
    let tampered = std::fs::read_to_string(&path)?.replace("Sala 3", "Sala 4");
    std::fs::write(&path, tampered)?;

    assert!(store.list_sessions().is_empty());

    let fresh = store.create_session("Sala 5", Sede::Medellin, Coleccion::Libros)?;
    assert_eq!(store.list_sessions(), vec![fresh]);
    Ok(())
}

/// A truncated file is moved aside and the next create starts a new collection
#[test]
fn test_jsonFileBackend_withTruncatedFile_shouldKeepBackupAndAcceptWrites() -> Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;
    let backend = JsonFileBackend::open(dir.path())?;
    let store = SessionStore::open(backend.clone());
    store.create_session("Sala 6", Sede::Oriente, Coleccion::Cds)?;

    let path = backend.path_for(SESSIONS_KEY);
    std::fs::write(&path, "{truncated")?;

    let created = store.create_session("New", Sede::Oriente, Coleccion::Cds)?;
    let again = store.create_session("Newer", Sede::Oriente, Coleccion::Cds)?;

    let names: Vec<_> = store.list_sessions().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec![created.name, again.name]);

    let backups: Vec<_> = std::fs::read_dir(dir.path())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("bibliotrack_sessions.json.corrupt-"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(std::fs::read_to_string(dir.path().join(&backups[0]))?, "{truncated");
    Ok(())
}

#[test]
fn test_sqliteBackend_twoStoresOnOneFile_shouldNotLoseUpdates() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("shared.db");

    let first = SessionStore::open(SqliteBackend::open(&path)?);
    let second = SessionStore::open(SqliteBackend::open(&path)?);

    let a = first.create_session("A", Sede::Medellin, Coleccion::Libros)?;
    let b = second.create_session("B", Sede::Medellin, Coleccion::Libros)?;

    let ids: Vec<_> = first.list_sessions().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
    Ok(())
}

#[test]
fn test_sqliteBackend_storesSingleBlobUnderSessionsKey() -> Result<()> {
    let backend = SqliteBackend::in_memory()?;
    let store = SessionStore::open(backend.clone());
    store.create_session("A", Sede::Medellin, Coleccion::Libros)?;
    store.create_session("B", Sede::Oriente, Coleccion::Cds)?;

    let raw = backend.read(SESSIONS_KEY)?.expect("blob should exist");
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(parsed.as_array().map(|a| a.len()), Some(2));
    assert_eq!(parsed[1]["coleccion"], "CDS");
    assert_eq!(backend.connection().stats()?.key_count, 1);
    Ok(())
}
