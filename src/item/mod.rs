// Item system module
//
// This module provides the item database used when restoring saves:
// - Item definitions and properties
// - Item registry for case-insensitive lookup by id
// - Item stacks for quantity management

pub mod definition;
pub mod properties;
pub mod registry;
pub mod stack;

// Re-export main types for convenient access
pub use definition::ItemDefinition;
pub use properties::{CropData, ItemProperties};
pub use registry::ItemRegistry;
pub use stack::ItemStack;
