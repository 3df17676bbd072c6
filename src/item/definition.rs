use super::properties::{CropData, ItemProperties};
use serde::{Deserialize, Serialize};

/// The blueprint for an item type
///
/// This defines the static properties of an item that are shared
/// across all instances. Think of it as the "class" and ItemStack
/// as the "instance".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique identifier (used for lookups and saves)
    pub id: String,

    /// Display name shown in UI
    pub name: String,

    /// Maximum stack size (1 = non-stackable, 64 = typical)
    pub max_stack_size: u32,

    /// Price when bought from a shop
    pub buy_price: u32,

    /// Price when sold to a shop
    pub sell_price: u32,

    /// Item-specific properties and behaviors
    pub properties: ItemProperties,
}

impl ItemDefinition {
    /// Creates a new item definition
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        max_stack_size: u32,
        properties: ItemProperties,
    ) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.into(),
            max_stack_size,
            buy_price: 0,
            sell_price: 0,
            properties,
        }
    }

    pub fn with_prices(mut self, buy_price: u32, sell_price: u32) -> Self {
        self.buy_price = buy_price;
        self.sell_price = sell_price;
        self
    }

    /// Crop grown from this item, if it is produce
    pub fn crop(&self) -> Option<CropData> {
        match self.properties {
            ItemProperties::Produce { crop } => Some(crop),
            ItemProperties::Material => None,
        }
    }
}
