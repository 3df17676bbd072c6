use super::error::InventoryError;
use super::inventory::Inventory;
use crate::item::{ItemRegistry, ItemStack};
use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use std::rc::Rc;

pub const CONTAINER_SIZE: usize = 12;

/// A world-placed item container such as a chest
///
/// Chests are authored into the world, so they carry an authored or
/// generated identifier rather than a fixed one.
pub struct ItemContainer {
    id: UniqueId,
    item_registry: Rc<ItemRegistry>,
    active: bool,
    slots: Inventory,
}

impl ItemContainer {
    pub fn new(id: UniqueId, item_registry: Rc<ItemRegistry>) -> Self {
        ItemContainer {
            id,
            item_registry,
            active: true,
            slots: Inventory::new(CONTAINER_SIZE),
        }
    }

    pub fn add_item(&mut self, item_id: &str, quantity: u32) -> Result<u32, InventoryError> {
        self.slots.add_item(item_id, quantity, &self.item_registry)
    }

    pub fn take_slot(&mut self, index: usize) -> Result<Option<ItemStack>, InventoryError> {
        self.slots.clear_slot(index)
    }

    pub fn has_items(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn slots(&self) -> &Inventory {
        &self.slots
    }
}

impl Saveable for ItemContainer {
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
        Snapshot::Container(self.slots.to_snapshots())
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::Container(saved) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "container", snapshot));
        };
        self.slots
            .restore_from_snapshots(saved, &self.item_registry, self.id.as_str());
        Ok(())
    }
}
