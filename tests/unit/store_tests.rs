/*!
 * Tests for the session store
 */

use bibliotrack::errors::InventoryError;
use bibliotrack::inventory::{Coleccion, InventoryItem, Sede};
use bibliotrack::store::{MemoryBackend, SessionStore, StorageBackend, SESSIONS_KEY};
use std::collections::HashSet;

use crate::common::{self, FailingBackend, UnreadableBackend};

#[test]
fn test_listSessions_onNeverInitializedStore_shouldBeEmpty() {
    let store = SessionStore::in_memory();
    assert!(store.list_sessions().is_empty());
    assert!(store.get_session("anything").is_none());
}

#[test]
fn test_createSession_shouldAssignUniqueIds() {
    let store = SessionStore::in_memory();

    let ids: HashSet<String> = (0..20)
        .map(|i| {
            store
                .create_session(&format!("Shelf {}", i), Sede::Medellin, Coleccion::Libros)
                .unwrap()
                .id
        })
        .collect();

    assert_eq!(ids.len(), 20);
    assert_eq!(store.list_sessions().len(), 20);
}

#[test]
fn test_createSession_shouldStartEmptyWithEqualTimestamps() {
    let (store, _) = common::create_test_store(Box::new(MemoryBackend::new()));

    let session = store.create_session("Shelf 1", Sede::Medellin, Coleccion::Libros).unwrap();

    assert!(session.items.is_empty());
    assert_eq!(session.created_at, 1_000);
    assert_eq!(session.created_at, session.updated_at);
}

#[test]
fn test_saveSession_twice_shouldBeIdempotent() {
    let backend = MemoryBackend::new();
    let (store, _) = common::create_test_store(Box::new(backend.clone()));
    let mut session = store.create_session("Shelf", Sede::Oriente, Coleccion::Cds).unwrap();
    session.push_item(InventoryItem::new("i-1", "A1", 1_500), 1_500);

    store.save_session(&session).unwrap();
    let after_first = backend.read(SESSIONS_KEY).unwrap();
    store.save_session(&session).unwrap();

    assert_eq!(backend.read(SESSIONS_KEY).unwrap(), after_first);
    assert_eq!(store.list_sessions(), vec![session]);
}

#[test]
fn test_saveSession_withNewId_shouldAppend() {
    let (store, _) = common::create_test_store(Box::new(MemoryBackend::new()));
    let first = store.create_session("A", Sede::Medellin, Coleccion::Libros).unwrap();

    let mut foreign = first.clone();
    foreign.id = "imported".to_string();
    store.save_session(&foreign).unwrap();

    let ids: Vec<_> = store.list_sessions().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.id, "imported".to_string()]);
}

#[test]
fn test_deleteSession_shouldRemoveExactlyTarget() {
    let (store, _) = common::create_test_store(Box::new(MemoryBackend::new()));
    let a = store.create_session("A", Sede::Medellin, Coleccion::Libros).unwrap();
    let b = store.create_session("B", Sede::Medellin, Coleccion::Libros).unwrap();
    let c = store.create_session("C", Sede::Medellin, Coleccion::Libros).unwrap();

    store.delete_session(&b.id).unwrap();
    store.delete_session(&b.id).unwrap();

    assert_eq!(store.list_sessions(), vec![a, c]);
}

#[test]
fn test_listSessions_withCorruptBlob_shouldBeEmpty() {
    let backend = MemoryBackend::new();
    backend.write(SESSIONS_KEY, r#"[{"id": 42}]"#).unwrap();
    let (store, _) = common::create_test_store(Box::new(backend));

    assert!(store.list_sessions().is_empty());
}

#[test]
fn test_listSessions_withUnreadableMedium_shouldBeEmpty() {
    let (store, _) = common::create_test_store(Box::new(UnreadableBackend));
    assert!(store.list_sessions().is_empty());
}

#[test]
fn test_saveSession_withFailingMedium_shouldSurfacePersistenceError() {
    let (store, _) = common::create_test_store(Box::new(FailingBackend));

    let result = store.create_session("Shelf", Sede::Medellin, Coleccion::Libros);

    match result {
        Err(InventoryError::Persistence(msg)) => assert!(msg.contains("disk full")),
        other => panic!("Expected persistence error, got {:?}", other),
    }
}

#[test]
fn test_saveSession_withUnreadableMedium_shouldNotOverwrite() {
    let (store, _) = common::create_test_store(Box::new(UnreadableBackend));

    let result = store.create_session("Shelf", Sede::Medellin, Coleccion::Libros);

    assert!(matches!(result, Err(InventoryError::Persistence(_))));
}

#[test]
fn test_close_shouldReleaseBackend() {
    let store = SessionStore::in_memory();
    assert_eq!(store.backend_name(), "memory");
    assert!(store.close().is_ok());
}
