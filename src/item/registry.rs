use super::definition::ItemDefinition;
use super::properties::*;
use crate::inventory::InventoryError;
use std::collections::HashMap;
use tracing::{info, warn};

/// Central registry of all item definitions
///
/// This is the single source of truth for what items exist in the game.
/// All item references (in inventories, crops, saves) use IDs that
/// look up definitions in this registry. Lookups ignore case, so a save
/// that spells an id "Wood" still resolves to "wood".
pub struct ItemRegistry {
    items: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        ItemRegistry {
            items: HashMap::new(),
        }
    }

    /// Creates a registry with all game items pre-registered
    pub fn create_default() -> Self {
        let mut registry = Self::new();
        registry.register_base_items();
        info!(count = registry.len(), "Item registry ready");
        registry
    }

    /// Registers a new item definition
    ///
    /// Returns error if an item with this ID already exists.
    pub fn register(&mut self, item: ItemDefinition) -> Result<(), InventoryError> {
        let key = item.id.to_lowercase();
        if self.items.contains_key(&key) {
            return Err(InventoryError::DuplicateItem(item.id));
        }

        self.items.insert(key, item);
        Ok(())
    }

    /// Gets an item definition by ID, ignoring case
    ///
    /// Returns None if no item with this ID exists.
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(&id.to_lowercase())
    }

    /// Removes an item definition, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<ItemDefinition> {
        self.items.remove(&id.to_lowercase())
    }

    /// Returns true if an item with this ID exists
    pub fn exists(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ======================================================================
    // Item Registration - Base Game Items
    // ======================================================================

    /// Registers all base game items
    fn register_base_items(&mut self) {
        let base_items = [
            ItemDefinition::new("wood", "Wood", 64, ItemProperties::Material).with_prices(4, 1),
            ItemDefinition::new("stone", "Stone", 64, ItemProperties::Material).with_prices(4, 1),
            ItemDefinition::new("slime_ball", "Slime Ball", 64, ItemProperties::Material)
                .with_prices(0, 2),
            ItemDefinition::new(
                "carrot",
                "Carrot",
                32,
                ItemProperties::Produce {
                    crop: CropData {
                        growth_stages: 4,
                        yield_amount: 2,
                    },
                },
            )
            .with_prices(10, 5),
            ItemDefinition::new(
                "wheat",
                "Wheat",
                32,
                ItemProperties::Produce {
                    crop: CropData {
                        growth_stages: 3,
                        yield_amount: 1,
                    },
                },
            )
            .with_prices(6, 3),
        ];

        for item in base_items {
            if let Err(e) = self.register(item) {
                warn!(error = %e, "Skipping base item");
            }
        }
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::create_default()
    }
}
