/// Errors that can occur during inventory operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// Slot index out of bounds
    #[error("Invalid slot index: {0}")]
    InvalidSlot(usize),

    /// Item ID doesn't exist in registry
    #[error("Invalid item ID: {0}")]
    InvalidItem(String),

    /// Item ID registered twice
    #[error("Item '{0}' already registered")]
    DuplicateItem(String),

    /// Slot is occupied (can't place different item)
    #[error("Slot {0} is occupied")]
    SlotOccupied(usize),
}
