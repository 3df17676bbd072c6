use serde::{Deserialize, Serialize};

/// A quantity of one item kind held in a slot
///
/// Stacks carry only the item id; limits such as the maximum stack size
/// come from the [`ItemRegistry`](super::ItemRegistry) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Canonical (lowercase) id in the item registry
    pub item_id: String,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        ItemStack {
            item_id: item_id.into(),
            quantity,
        }
    }

    /// Grows the stack up to `limit`, returning what did not fit
    pub fn add(&mut self, amount: u32, limit: u32) -> u32 {
        let room = limit.saturating_sub(self.quantity);
        let added = amount.min(room);
        self.quantity += added;
        amount - added
    }

    /// Shrinks the stack by at most `amount`, returning how many left it
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.quantity);
        self.quantity -= taken;
        taken
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}
