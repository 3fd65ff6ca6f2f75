//! Inventory projection
//!
//! The backend owns stock levels and prices. The client keeps a read-only
//! projection of them keyed by flavor tag. It only changes when a server
//! response says so (`apply_server_quantity`) or when it is reloaded wholesale.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::value_objects::FlavorTag;

/// Stock and price for one flavor tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub available: u32,
    pub price: f64,
    pub description: String,
    pub allergies: BTreeSet<String>,
}

impl InventoryEntry {
    pub fn new(available: u32, price: f64, description: impl Into<String>) -> Self {
        Self {
            available,
            price,
            description: description.into(),
            allergies: BTreeSet::new(),
        }
    }

    pub fn with_allergies<I, S>(mut self, allergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergies = allergies.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_stock(&self) -> bool {
        self.available > 0
    }
}

/// Inventory keyed by flavor tag. Always holds an entry for every tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    entries: BTreeMap<FlavorTag, InventoryEntry>,
}

impl Inventory {
    /// Hardcoded table used when the ingredients call fails.
    pub fn fallback() -> Self {
        let entries = FlavorTag::ALL
            .iter()
            .map(|tag| (*tag, Self::fallback_entry(*tag)))
            .collect();
        Self { entries }
    }

    /// The fallback row for a single tag
    pub fn fallback_entry(tag: FlavorTag) -> InventoryEntry {
        match tag {
            FlavorTag::Adventure => {
                InventoryEntry::new(3, 3.50, "Bold rum-kissed base for daring palates")
                    .with_allergies(["alcohol"])
            }
            FlavorTag::Classic => {
                InventoryEntry::new(7, 2.50, "Pure vanilla, the timeless favorite")
                    .with_allergies(["alcohol"])
            }
            FlavorTag::Light => InventoryEntry::new(2, 2.75, "Bright lemon with fresh zest")
                .with_allergies(["citrus"]),
            FlavorTag::Rich => InventoryEntry::new(3, 4.00, "Decadent 70% dark chocolate")
                .with_allergies(["milk", "soy", "caffeine"]),
            FlavorTag::Smooth => InventoryEntry::new(4, 3.00, "Silky whipped heavy cream")
                .with_allergies(["dairy"]),
            FlavorTag::Crunchy => InventoryEntry::new(5, 3.25, "Roasted hazelnut crunch")
                .with_allergies(["tree_nuts"]),
            FlavorTag::Sprinkles => InventoryEntry::new(4, 1.50, "Colorful mini marshmallows")
                .with_allergies(["gelatin"]),
            FlavorTag::Caramel => InventoryEntry::new(6, 2.00, "Sea-salt caramel drizzle")
                .with_allergies(["dairy"]),
        }
    }

    /// Build from backend rows. Tags the backend did not report keep their
    /// fallback entry.
    pub fn from_entries<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (FlavorTag, InventoryEntry)>,
    {
        let mut inventory = Self::fallback();
        for (tag, entry) in rows {
            inventory.entries.insert(tag, entry);
        }
        inventory
    }

    pub fn entry(&self, tag: FlavorTag) -> InventoryEntry {
        self.entries
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| Self::fallback_entry(tag))
    }

    pub fn available(&self, tag: FlavorTag) -> u32 {
        self.entries.get(&tag).map(|e| e.available).unwrap_or(0)
    }

    pub fn price(&self, tag: FlavorTag) -> f64 {
        self.entries
            .get(&tag)
            .map(|e| e.price)
            .unwrap_or_else(|| Self::fallback_entry(tag).price)
    }

    /// Overwrite the stock count with the number the backend reported.
    pub fn apply_server_quantity(&mut self, tag: FlavorTag, available: u32) {
        let mut entry = self.entry(tag);
        entry.available = available;
        self.entries.insert(tag, entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FlavorTag, &InventoryEntry)> {
        self.entries.iter()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::fallback()
    }
}
