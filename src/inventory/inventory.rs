use super::error::InventoryError;
use crate::item::{ItemRegistry, ItemStack};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Persisted form of one inventory slot
///
/// Items are stored by id so the save file does not depend on the item
/// database layout. An empty slot has no `item_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub item_name: Option<String>,
    pub quantity: u32,
}

/// Generic inventory container with slots
///
/// This is the core storage structure used by all inventory types.
/// It handles slot management, stacking, and basic operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Slots that can hold item stacks (None = empty)
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Creates a new empty inventory with the specified capacity
    pub fn new(capacity: usize) -> Self {
        Inventory {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the inventory has no items
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Counts how many of a specific item are in the inventory
    pub fn count_item(&self, item_id: &str) -> u32 {
        self.iter_items()
            .filter(|stack| stack.item_id == item_id)
            .map(|stack| stack.quantity)
            .sum()
    }

    /// Finds the first empty slot index
    pub fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Adds items to the inventory
    ///
    /// Returns the number of items that couldn't fit (overflow).
    /// Returns 0 if all items were added successfully.
    ///
    /// # Strategy
    /// 1. Try to stack with existing items first
    /// 2. Create new stacks in empty slots
    /// 3. Return overflow if inventory is full
    pub fn add_item(
        &mut self,
        item_id: &str,
        quantity: u32,
        item_registry: &ItemRegistry,
    ) -> Result<u32, InventoryError> {
        if quantity == 0 {
            return Ok(0);
        }

        let item_def = item_registry
            .get(item_id)
            .ok_or_else(|| InventoryError::InvalidItem(item_id.to_string()))?;

        let canonical_id = item_def.id.as_str();
        let max_stack_size = item_def.max_stack_size;
        let mut remaining = quantity;

        // Phase 1: Try to add to existing stacks
        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.item_id == canonical_id && stack.quantity < max_stack_size {
                remaining = stack.add(remaining, max_stack_size);
            }
        }

        // Phase 2: Create new stacks in empty slots
        while remaining > 0 {
            let Some(empty_index) = self.find_empty_slot() else {
                break;
            };
            let stack_size = remaining.min(max_stack_size);
            self.slots[empty_index] = Some(ItemStack::new(canonical_id, stack_size));
            remaining -= stack_size;
        }

        Ok(remaining)
    }

    /// Removes items from the inventory
    ///
    /// Returns the number of items actually removed (might be less than requested).
    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> u32 {
        let mut remaining = quantity;
        let mut removed_total = 0;

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }

            if let Some(stack) = slot {
                if stack.item_id == item_id {
                    let taken = stack.take(remaining);
                    remaining -= taken;
                    removed_total += taken;

                    if stack.is_empty() {
                        *slot = None;
                    }
                }
            }
        }

        removed_total
    }

    /// Places a stack in a specific empty slot
    pub fn place_in_slot(
        &mut self,
        slot_index: usize,
        item_stack: ItemStack,
    ) -> Result<(), InventoryError> {
        let slot = self
            .slots
            .get_mut(slot_index)
            .ok_or(InventoryError::InvalidSlot(slot_index))?;
        if slot.is_some() {
            return Err(InventoryError::SlotOccupied(slot_index));
        }
        *slot = Some(item_stack);
        Ok(())
    }

    /// Empties one slot, returning what was in it
    pub fn clear_slot(&mut self, slot_index: usize) -> Result<Option<ItemStack>, InventoryError> {
        self.slots
            .get_mut(slot_index)
            .map(Option::take)
            .ok_or(InventoryError::InvalidSlot(slot_index))
    }

    /// Clears all items from the inventory
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Returns an iterator over all non-empty item stacks
    pub fn iter_items(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Converts every slot, empty ones included, to its persisted form
    pub fn to_snapshots(&self) -> Vec<SlotSnapshot> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(stack) => SlotSnapshot {
                    item_name: Some(stack.item_id.clone()),
                    quantity: stack.quantity,
                },
                None => SlotSnapshot::default(),
            })
            .collect()
    }

    /// Rebuilds every slot from persisted slots
    ///
    /// Capacity is kept: missing saved slots become empty and extra ones are
    /// dropped. A slot naming an item the registry no longer knows is left
    /// empty and reported; the remaining slots are still restored. Stacks
    /// larger than the item's max stack size are clamped.
    ///
    /// Returns the number of slots that could not be resolved.
    pub fn restore_from_snapshots(
        &mut self,
        saved: &[SlotSnapshot],
        item_registry: &ItemRegistry,
        owner_id: &str,
    ) -> usize {
        if saved.len() > self.capacity() {
            warn!(
                owner = owner_id,
                saved = saved.len(),
                capacity = self.capacity(),
                "Dropping saved slots beyond capacity"
            );
        }

        let mut unresolved = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            *slot = match saved.get(index) {
                Some(SlotSnapshot {
                    item_name: Some(name),
                    quantity,
                }) if *quantity > 0 => match item_registry.get(name) {
                    Some(def) => {
                        if *quantity > def.max_stack_size {
                            warn!(
                                owner = owner_id,
                                slot = index,
                                item = %def.id,
                                quantity = *quantity,
                                max_stack_size = def.max_stack_size,
                                "Saved stack too large, clamping"
                            );
                        }
                        Some(ItemStack::new(
                            def.id.clone(),
                            (*quantity).min(def.max_stack_size),
                        ))
                    }
                    None => {
                        error!(owner = owner_id, slot = index, item = %name, "Unknown item in save, slot left empty");
                        unresolved += 1;
                        None
                    }
                },
                _ => None,
            };
        }
        unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_stacks_then_fills_empty_slots() {
        let registry = ItemRegistry::create_default();
        let mut inventory = Inventory::new(3);

        assert_eq!(inventory.add_item("wood", 70, &registry).unwrap(), 0);
        assert_eq!(inventory.slot(0).unwrap().quantity, 64);
        assert_eq!(inventory.slot(1).unwrap().quantity, 6);
        assert_eq!(inventory.count_item("wood"), 70);
    }

    #[test]
    fn test_add_item_reports_overflow_and_unknown_items() {
        let registry = ItemRegistry::create_default();
        let mut inventory = Inventory::new(1);

        assert_eq!(inventory.add_item("stone", 100, &registry).unwrap(), 36);
        assert_eq!(
            inventory.add_item("diamond", 1, &registry),
            Err(InventoryError::InvalidItem("diamond".to_string()))
        );
    }

    #[test]
    fn test_remove_item_clears_empty_slots() {
        let registry = ItemRegistry::create_default();
        let mut inventory = Inventory::new(2);
        inventory.add_item("wood", 5, &registry).unwrap();

        assert_eq!(inventory.remove_item("wood", 8), 5);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_place_and_clear_slot() {
        let mut inventory = Inventory::new(2);
        inventory.place_in_slot(1, ItemStack::new("wood", 2)).unwrap();

        assert_eq!(
            inventory.place_in_slot(1, ItemStack::new("stone", 1)),
            Err(InventoryError::SlotOccupied(1))
        );
        assert_eq!(inventory.clear_slot(1).unwrap(), Some(ItemStack::new("wood", 2)));
        assert_eq!(inventory.clear_slot(5), Err(InventoryError::InvalidSlot(5)));
    }

    #[test]
    fn test_snapshot_round_trip_keeps_slot_positions() {
        let registry = ItemRegistry::create_default();
        let mut inventory = Inventory::new(4);
        inventory.place_in_slot(2, ItemStack::new("carrot", 3)).unwrap();

        let saved = inventory.to_snapshots();
        assert_eq!(saved.len(), 4);

        let mut restored = Inventory::new(4);
        restored.add_item("stone", 1, &registry).unwrap();
        assert_eq!(restored.restore_from_snapshots(&saved, &registry, "test"), 0);
        assert_eq!(restored, inventory);
    }

    #[test]
    fn test_restore_leaves_unknown_item_slot_empty() {
        let registry = ItemRegistry::create_default();
        let saved = vec![
            SlotSnapshot {
                item_name: Some("ancient_relic".to_string()),
                quantity: 1,
            },
            SlotSnapshot {
                item_name: Some("Wood".to_string()),
                quantity: 4,
            },
        ];

        let mut inventory = Inventory::new(3);
        let unresolved = inventory.restore_from_snapshots(&saved, &registry, "test");

        assert_eq!(unresolved, 1);
        assert!(inventory.slot(0).is_none());
        assert_eq!(inventory.slot(1), Some(&ItemStack::new("wood", 4)));
        assert!(inventory.slot(2).is_none());
    }

    #[test]
    fn test_restore_clamps_oversized_stacks() {
        let registry = ItemRegistry::create_default();
        let saved = vec![SlotSnapshot {
            item_name: Some("carrot".to_string()),
            quantity: 1_000_000_000,
        }];

        let mut inventory = Inventory::new(2);
        assert_eq!(inventory.restore_from_snapshots(&saved, &registry, "test"), 0);
        assert_eq!(inventory.slot(0), Some(&ItemStack::new("carrot", 32)));
    }
}
