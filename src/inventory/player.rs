use super::error::InventoryError;
use super::inventory::{Inventory, SlotSnapshot};
use crate::item::{ItemRegistry, ItemStack};
use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Fixed save identifier of the player's items
pub const PLAYER_ITEMS_ID: &str = "player_items";

pub const INVENTORY_SIZE: usize = 16;
pub const HOTBAR_SIZE: usize = 5;

/// Which of the player's slot lists an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    Inventory,
    Hotbar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerItemsSnapshot {
    pub money: u32,
    pub inventory_slots: Vec<SlotSnapshot>,
    pub hotbar_slots: Vec<SlotSnapshot>,
}

/// Everything the player carries: money, main inventory and hotbar
///
/// There is exactly one of these, so it is saved under a fixed identifier.
pub struct PlayerItems {
    id: UniqueId,
    item_registry: Rc<ItemRegistry>,
    active: bool,
    money: u32,
    inventory: Inventory,
    hotbar: Inventory,
}

impl PlayerItems {
    /// Creates empty player items
    ///
    /// Layout:
    /// - Inventory: 16 slots
    /// - Hotbar: 5 slots
    pub fn new(item_registry: Rc<ItemRegistry>) -> Self {
        PlayerItems {
            id: UniqueId::fixed(PLAYER_ITEMS_ID),
            item_registry,
            active: true,
            money: 0,
            inventory: Inventory::new(INVENTORY_SIZE),
            hotbar: Inventory::new(HOTBAR_SIZE),
        }
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Spends money if there is enough of it
    pub fn remove_money(&mut self, amount: u32) -> bool {
        if amount > self.money {
            return false;
        }
        self.money -= amount;
        true
    }

    /// Adds items to the main inventory, returning the overflow
    pub fn add_item(&mut self, item_id: &str, quantity: u32) -> Result<u32, InventoryError> {
        self.inventory.add_item(item_id, quantity, &self.item_registry)
    }

    /// Sells one whole slot for its sell price
    pub fn sell_slot(&mut self, container: ContainerType, index: usize) -> Result<u32, InventoryError> {
        let Some(stack) = self.slots_mut(container).clear_slot(index)? else {
            return Ok(0);
        };
        let price = self
            .item_registry
            .get(&stack.item_id)
            .map(|def| def.sell_price)
            .ok_or_else(|| InventoryError::InvalidItem(stack.item_id.clone()))?;
        let total = price.saturating_mul(stack.quantity);
        self.add_money(total);
        Ok(total)
    }

    pub fn slot(&self, container: ContainerType, index: usize) -> Option<&ItemStack> {
        self.slots(container).slot(index)
    }

    pub fn clear_slot(
        &mut self,
        container: ContainerType,
        index: usize,
    ) -> Result<Option<ItemStack>, InventoryError> {
        self.slots_mut(container).clear_slot(index)
    }

    /// Total of an item across inventory and hotbar
    pub fn item_count(&self, item_id: &str) -> u32 {
        self.inventory.count_item(item_id) + self.hotbar.count_item(item_id)
    }

    pub fn slots(&self, container: ContainerType) -> &Inventory {
        match container {
            ContainerType::Inventory => &self.inventory,
            ContainerType::Hotbar => &self.hotbar,
        }
    }

    fn slots_mut(&mut self, container: ContainerType) -> &mut Inventory {
        match container {
            ContainerType::Inventory => &mut self.inventory,
            ContainerType::Hotbar => &mut self.hotbar,
        }
    }
}

impl Saveable for PlayerItems {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn capture(&self) -> Snapshot {
        Snapshot::PlayerItems(PlayerItemsSnapshot {
            money: self.money,
            inventory_slots: self.inventory.to_snapshots(),
            hotbar_slots: self.hotbar.to_snapshots(),
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::PlayerItems(saved) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "player_items", snapshot));
        };

        self.money = saved.money;
        let owner = self.id.as_str();
        self.inventory
            .restore_from_snapshots(&saved.inventory_slots, &self.item_registry, owner);
        self.hotbar
            .restore_from_snapshots(&saved.hotbar_slots, &self.item_registry, owner);
        Ok(())
    }
}
