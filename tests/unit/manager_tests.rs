/*!
 * Tests for item mutations through the inventory manager
 */

use bibliotrack::errors::InventoryError;
use bibliotrack::inventory::{Coleccion, InventoryItem, InventoryManager, MatchStrategy, Sede};
use bibliotrack::store::{SessionStore, StorageBackend, SESSIONS_KEY};
use std::sync::Arc;

use bibliotrack::inventory::{ManualClock, SequentialIdGenerator};
use bibliotrack::store::MemoryBackend;

use crate::common;

#[test]
fn test_addItem_onEmptySession_shouldRecordOneItem() {
    let (manager, _, _) = common::create_test_manager();
    let session = manager.create_session("Shelf", Sede::Medellin, Coleccion::Libros).unwrap();

    let updated = manager.add_item(&session, "12345").unwrap();

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].barcode, "12345");
    assert!(!updated.items[0].synced);
    assert!(updated.items[0].stable_id().is_some());
    assert!(updated.updated_at >= updated.created_at);
}

#[test]
fn test_scenario_threeScansWithRepeat_shouldKeepOrderAndDistinctIds() {
    let (manager, clock, _) = common::create_test_manager();
    let session = manager.create_session("Shelf 1", Sede::Medellin, Coleccion::Libros).unwrap();

    let mut current = session;
    for code in ["A1", "A2", "A1"] {
        clock.advance(10);
        current = manager.add_item(&current, code).unwrap();
    }

    let persisted = manager.store().get_session(&current.id).unwrap();
    let barcodes: Vec<_> = persisted.items.iter().map(|i| i.barcode.as_str()).collect();
    assert_eq!(barcodes, vec!["A1", "A2", "A1"]);
    assert_eq!(persisted.items[0].barcode, persisted.items[2].barcode);
    assert_ne!(persisted.items[0].id, persisted.items[2].id);
    assert_eq!(persisted.updated_at, 1_030);
}

#[test]
fn test_removeItem_byId_shouldNotTouchLegacyItemWithSameTimestamp() {
    let (manager, _, _) = common::create_test_manager();
    let mut session = manager.create_session("Shelf", Sede::Medellin, Coleccion::Libros).unwrap();
    session.items.push(InventoryItem::legacy("OLD", 1_000));
    manager.store().save_session(&session).unwrap();
    let session = manager.add_item(&session, "NEW").unwrap();

    let target = session.items[1].clone();
    let updated = manager.remove_item(&session, &target).unwrap();

    assert_eq!(updated.items, vec![InventoryItem::legacy("OLD", 1_000)]);
}

#[test]
fn test_removeItem_legacyTarget_shouldNotTouchIdBearingItems() {
    let (manager, _, _) = common::create_test_manager();
    let session = manager.create_session("Shelf", Sede::Medellin, Coleccion::Libros).unwrap();
    let session = manager.add_item(&session, "NEW").unwrap();

    let updated = manager
        .remove_item(&session, &InventoryItem::legacy("NEW", session.items[0].timestamp))
        .unwrap();

    assert_eq!(updated, session);
}

#[test]
fn test_removeItem_withDuplicateLegacyTimestamps_shouldRemoveFirstOnly() {
    let (manager, _, _) = common::create_test_manager();
    let mut session = manager.create_session("Shelf", Sede::Medellin, Coleccion::Libros).unwrap();
    session.items.push(InventoryItem::legacy("FIRST", 500));
    session.items.push(InventoryItem::legacy("SECOND", 500));
    manager.store().save_session(&session).unwrap();

    let updated = manager.remove_item_by_timestamp(&session, 500).unwrap();

    assert_eq!(updated.items, vec![InventoryItem::legacy("SECOND", 500)]);
}

#[test]
fn test_removeItem_withIdOnlyPrecedence_shouldIgnoreLegacyTargets() {
    let backend = MemoryBackend::new();
    let store = SessionStore::with_collaborators(
        Box::new(backend),
        Arc::new(SequentialIdGenerator::new("id")),
        Arc::new(ManualClock::new(1_000)),
    );
    let manager = InventoryManager::with_precedence(store, vec![MatchStrategy::ById]);
    let mut session = manager.create_session("Shelf", Sede::Medellin, Coleccion::Libros).unwrap();
    session.items.push(InventoryItem::legacy("OLD", 700));
    manager.store().save_session(&session).unwrap();

    let updated = manager.remove_item_by_timestamp(&session, 700).unwrap();

    assert_eq!(updated.item_count(), 1);
}

#[test]
fn test_addItem_whenSaveFails_shouldLeaveCallerSnapshotUntouched() {
    let (store, _) = common::create_test_store(Box::new(common::FailingBackend));
    let manager = InventoryManager::new(store);
    let session = bibliotrack::inventory::InventorySession::new(
        "s-1",
        "Shelf",
        Sede::Medellin,
        Coleccion::Libros,
        1_000,
    );

    let result = manager.add_item(&session, "A1");

    assert!(matches!(result, Err(InventoryError::Persistence(_))));
    assert!(session.items.is_empty());
}

#[test]
fn test_addItems_withOnlyBlankCodes_shouldNotWrite() {
    let (manager, _, backend) = common::create_test_manager();
    let session = manager.create_session("Shelf", Sede::Medellin, Coleccion::Libros).unwrap();
    let before = backend.read(SESSIONS_KEY).unwrap();

    let updated = manager.add_items(&session, &["", "\r\n", "   "]).unwrap();

    assert_eq!(updated, session);
    assert_eq!(backend.read(SESSIONS_KEY).unwrap(), before);
}
