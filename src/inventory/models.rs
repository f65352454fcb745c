/*!
 * Inventory session and item models.
 *
 * These structures are persisted as-is inside the session blob, so their
 * serialized field names and enumeration tags are part of the storage format.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::matching::{self, MatchStrategy};

/// Physical site where an inventory takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sede {
    #[default]
    #[serde(rename = "MEDELLIN")]
    Medellin,
    #[serde(rename = "ORIENTE")]
    Oriente,
    #[serde(rename = "URABA")]
    Uraba,
}

impl Sede {
    /// All sites, in display order
    pub const ALL: [Sede; 3] = [Sede::Medellin, Sede::Oriente, Sede::Uraba];

    /// Literal tag used in storage and reports
    pub fn tag(&self) -> &'static str {
        match self {
            Sede::Medellin => "MEDELLIN",
            Sede::Oriente => "ORIENTE",
            Sede::Uraba => "URABA",
        }
    }
}

impl fmt::Display for Sede {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for Sede {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MEDELLIN" => Ok(Sede::Medellin),
            "ORIENTE" => Ok(Sede::Oriente),
            "URABA" => Ok(Sede::Uraba),
            _ => Err(anyhow::anyhow!("Invalid sede: {}", s)),
        }
    }
}

/// Category of material being inventoried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Coleccion {
    #[default]
    #[serde(rename = "LIBROS")]
    Libros,
    #[serde(rename = "REVISTAS")]
    Revistas,
    #[serde(rename = "FOLLETOS")]
    Folletos,
    /// Printed theses and degree works. The tag contains a space.
    #[serde(rename = "TDG FISICOS")]
    TdgFisicos,
    #[serde(rename = "CDS")]
    Cds,
    #[serde(rename = "NORMAS")]
    Normas,
}

impl Coleccion {
    /// All collection types, in display order
    pub const ALL: [Coleccion; 6] = [
        Coleccion::Libros,
        Coleccion::Revistas,
        Coleccion::Folletos,
        Coleccion::TdgFisicos,
        Coleccion::Cds,
        Coleccion::Normas,
    ];

    /// Literal tag used in storage and reports
    pub fn tag(&self) -> &'static str {
        match self {
            Coleccion::Libros => "LIBROS",
            Coleccion::Revistas => "REVISTAS",
            Coleccion::Folletos => "FOLLETOS",
            Coleccion::TdgFisicos => "TDG FISICOS",
            Coleccion::Cds => "CDS",
            Coleccion::Normas => "NORMAS",
        }
    }
}

impl fmt::Display for Coleccion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for Coleccion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('_', " ").as_str() {
            "LIBROS" => Ok(Coleccion::Libros),
            "REVISTAS" => Ok(Coleccion::Revistas),
            "FOLLETOS" => Ok(Coleccion::Folletos),
            "TDG FISICOS" => Ok(Coleccion::TdgFisicos),
            "CDS" => Ok(Coleccion::Cds),
            "NORMAS" => Ok(Coleccion::Normas),
            _ => Err(anyhow::anyhow!("Invalid coleccion: {}", s)),
        }
    }
}

/// One scan event: a barcode and when it was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique identifier. Items written by older versions may not carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Scanned or typed payload
    pub barcode: String,
    /// Creation time in milliseconds since epoch
    pub timestamp: i64,
    /// Reserved for remote sync, always false for now
    #[serde(default)]
    pub synced: bool,
}

impl InventoryItem {
    /// Create a new, unsynced item
    pub fn new(id: impl Into<String>, barcode: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Some(id.into()),
            barcode: barcode.into(),
            timestamp,
            synced: false,
        }
    }

    /// Create an item the way older versions stored them, without an id
    pub fn legacy(barcode: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: None,
            barcode: barcode.into(),
            timestamp,
            synced: false,
        }
    }

    /// The identifier, if the item has a usable one. Empty ids count as absent.
    pub fn stable_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether this item predates id assignment
    pub fn is_legacy(&self) -> bool {
        self.stable_id().is_none()
    }
}

/// One inventory-counting exercise for a site and collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySession {
    /// Session ID
    pub id: String,
    /// Free-text label, not unique
    pub name: String,
    /// Site
    pub sede: Sede,
    /// Collection type
    pub coleccion: Coleccion,
    /// Creation time in milliseconds since epoch
    pub created_at: i64,
    /// Last mutation time in milliseconds since epoch
    pub updated_at: i64,
    /// Scanned items, oldest first
    #[serde(default)]
    pub items: Vec<InventoryItem>,
}

impl InventorySession {
    /// Create an empty session stamped with `now`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sede: Sede,
        coleccion: Coleccion,
        now: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sede,
            coleccion,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    /// Number of scanned items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been scanned yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Most recently scanned item
    pub fn last_item(&self) -> Option<&InventoryItem> {
        self.items.last()
    }

    /// Timestamp of the most recent scan
    pub fn last_scan_at(&self) -> Option<i64> {
        self.last_item().map(|item| item.timestamp)
    }

    /// First eight characters of the id, for display
    pub fn short_id(&self) -> String {
        self.id.chars().take(8).collect()
    }

    /// Mark the session as modified at `now`, never earlier than its creation
    pub fn touch(&mut self, now: i64) {
        self.updated_at = now.max(self.created_at);
    }

    /// Append an item and mark the session modified
    pub fn push_item(&mut self, item: InventoryItem, now: i64) {
        self.items.push(item);
        self.touch(now);
    }

    /// Remove the first item matching `target` under the default precedence.
    ///
    /// Returns the removed item; the session is left untouched when nothing matches.
    pub fn remove_item(&mut self, target: &InventoryItem, now: i64) -> Option<InventoryItem> {
        self.remove_item_with(target, matching::DEFAULT_PRECEDENCE, now)
    }

    /// Remove the first item matching `target` under an explicit precedence list
    pub fn remove_item_with(
        &mut self,
        target: &InventoryItem,
        precedence: &[MatchStrategy],
        now: i64,
    ) -> Option<InventoryItem> {
        let index = matching::find_match(&self.items, target, precedence)?;
        let removed = self.items.remove(index);
        self.touch(now);
        Some(removed)
    }
}

impl fmt::Display for InventorySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({} / {}, {} items)",
            self.short_id(),
            self.name,
            self.sede,
            self.coleccion,
            self.item_count()
        )
    }
}

/// Order sessions the way the home list shows them: most recently updated first
pub fn sort_by_recent(sessions: &mut [InventorySession]) {
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
