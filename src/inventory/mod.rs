// Inventory system module
//
// This module provides the savable item holders:
// - Generic inventory container with slots
// - Player items (money, inventory and hotbar) under a fixed identifier
// - World containers (chests) under generated identifiers

pub mod container;
pub mod error;
pub mod inventory;
pub mod player;

// Re-export main types
pub use container::ItemContainer;
pub use error::InventoryError;
pub use inventory::{Inventory, SlotSnapshot};
pub use player::{ContainerType, PlayerItems, PlayerItemsSnapshot};
