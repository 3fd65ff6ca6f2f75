//! Inventory loading
//!
//! Builds the client-side inventory projection from `/ingredients`, joined
//! to flavor tags through `/selection-mappings`. Any failure falls back to
//! the hardcoded table so the game can always start.

use std::collections::BTreeMap;

use stampalooza_domain::{FlavorTag, Inventory, InventoryEntry};
use stampalooza_shared::{IngredientRow, SelectionMapping};

use crate::application::api::Api;

/// Where the current projection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventorySource {
    Backend,
    Fallback,
}

/// Inventory projection plus the backend ingredient name for each tag
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryCatalog {
    pub inventory: Inventory,
    pub ingredient_names: BTreeMap<FlavorTag, String>,
    pub source: InventorySource,
}

impl InventoryCatalog {
    pub fn fallback() -> Self {
        Self {
            inventory: Inventory::fallback(),
            ingredient_names: default_ingredient_names(),
            source: InventorySource::Fallback,
        }
    }

    /// Backend ingredient name used for `/update-inventory`
    pub fn ingredient_name(&self, tag: FlavorTag) -> &str {
        self.ingredient_names
            .get(&tag)
            .map(String::as_str)
            .unwrap_or_else(|| tag.backend_ingredient())
    }

    /// Reverse lookup from a backend ingredient name
    pub fn tag_for_ingredient(&self, ingredient: &str) -> Option<FlavorTag> {
        self.ingredient_names
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(ingredient))
            .map(|(tag, _)| *tag)
    }
}

fn default_ingredient_names() -> BTreeMap<FlavorTag, String> {
    FlavorTag::ALL
        .iter()
        .map(|tag| (*tag, tag.backend_ingredient().to_string()))
        .collect()
}

/// Fetch ingredients and mappings. Never fails; degrades to the fallback.
pub async fn load_inventory(api: &Api) -> InventoryCatalog {
    let rows = match api.ingredients().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load ingredients, using fallback inventory");
            return InventoryCatalog::fallback();
        }
    };

    let mut ingredient_names = default_ingredient_names();
    match api.selection_mappings().await {
        Ok(mappings) => apply_mappings(&mut ingredient_names, &mappings),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load selection mappings, using built-in names");
        }
    }

    let inventory = build_inventory(&rows, &ingredient_names);
    tracing::info!(rows = rows.len(), "Inventory loaded from backend");
    InventoryCatalog {
        inventory,
        ingredient_names,
        source: InventorySource::Backend,
    }
}

fn apply_mappings(names: &mut BTreeMap<FlavorTag, String>, mappings: &[SelectionMapping]) {
    for mapping in mappings {
        match mapping.frontend_choice.parse::<FlavorTag>() {
            Ok(tag) => {
                names.insert(tag, mapping.backend_ingredient.clone());
            }
            Err(_) => {
                tracing::debug!(choice = %mapping.frontend_choice, "Ignoring unknown selection mapping");
            }
        }
    }
}

/// Join backend rows to tags. Tags without a row keep their fallback entry.
fn build_inventory(rows: &[IngredientRow], names: &BTreeMap<FlavorTag, String>) -> Inventory {
    let entries = names.iter().filter_map(|(tag, name)| {
        let row = rows
            .iter()
            .find(|row| row.ingredient.eq_ignore_ascii_case(name))?;
        let fallback = Inventory::fallback_entry(*tag);
        let price = row.price().unwrap_or(fallback.price);
        let description = if row.description.is_empty() {
            fallback.description
        } else {
            row.description.clone()
        };
        let entry = InventoryEntry::new(row.available(), price, description)
            .with_allergies(row.allergies.iter().cloned());
        Some((*tag, entry))
    });
    Inventory::from_entries(entries)
}
