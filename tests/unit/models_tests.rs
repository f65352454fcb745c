/*!
 * Tests for session and item models
 */

use bibliotrack::inventory::models::sort_by_recent;
use bibliotrack::inventory::{Coleccion, InventoryItem, InventorySession, Sede};

#[test]
fn test_session_roundTrip_shouldPreserveEveryField() {
    let mut session = InventorySession::new("s-1", "Sala 2", Sede::Oriente, Coleccion::TdgFisicos, 1_000);
    session.push_item(InventoryItem::new("i-1", "A1", 1_100), 1_100);
    session.push_item(InventoryItem::legacy("OLD", 900), 1_200);

    let json = serde_json::to_string(&session).unwrap();
    let restored: InventorySession = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, session);
    assert!(json.contains(r#""coleccion":"TDG FISICOS""#));
}

#[test]
fn test_session_fromLegacyJson_shouldLoadItemsWithoutIds() {
    let json = r#"{
        "id": "abc",
        "name": "Legacy",
        "sede": "URABA",
        "coleccion": "NORMAS",
        "createdAt": 10,
        "updatedAt": 20,
        "items": [{"barcode": "X", "timestamp": 15, "synced": false}]
    }"#;

    let session: InventorySession = serde_json::from_str(json).unwrap();

    assert_eq!(session.item_count(), 1);
    assert!(session.items[0].is_legacy());
    assert_eq!(session.last_scan_at(), Some(15));

    let written = serde_json::to_string(&session).unwrap();
    assert!(!written.contains(r#""id":null"#));
}

#[test]
fn test_session_withUnknownSede_shouldFailToParse() {
    let json = r#"{"id":"a","name":"n","sede":"BOGOTA","coleccion":"LIBROS","createdAt":1,"updatedAt":1,"items":[]}"#;
    assert!(serde_json::from_str::<InventorySession>(json).is_err());
}

#[test]
fn test_sortByRecent_shouldOrderByUpdatedAtDescending() {
    let mut sessions: Vec<InventorySession> = [(1, 300), (2, 100), (3, 200)]
        .iter()
        .map(|(n, updated)| {
            let mut s = InventorySession::new(format!("s-{}", n), "x", Sede::Medellin, Coleccion::Libros, 0);
            s.touch(*updated);
            s
        })
        .collect();

    sort_by_recent(&mut sessions);

    let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s-1", "s-3", "s-2"]);
}

#[test]
fn test_allTags_shouldMatchDisplay() {
    for sede in Sede::ALL {
        assert_eq!(sede.to_string(), sede.tag());
        assert_eq!(sede.tag().parse::<Sede>().unwrap(), sede);
    }
    for coleccion in Coleccion::ALL {
        assert_eq!(coleccion.to_string(), coleccion.tag());
        assert_eq!(coleccion.tag().parse::<Coleccion>().unwrap(), coleccion);
    }
}
