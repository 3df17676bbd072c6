//! Farming manager
//!
//! Owns every tilled cell and planted crop. Crops are not registered with
//! the save registry on their own; the manager persists them all under its
//! fixed identifier and replants them from the item database on load.
//!
//! # Restore Strategy
//! 1. Drop every crop and clear both indexes
//! 2. Re-till the saved cells (dry)
//! 3. Replant each crop whose yield item is still produce, skipping others
//! 4. Re-derive the harvestable flag and the watered state of the soil

use super::crop::PlantedCrop;
use crate::item::{ItemRegistry, ItemStack};
use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, error, info};

/// Fixed save identifier of the farm
pub const FARMING_MANAGER_ID: &str = "farming_manager";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantedCropSnapshot {
    pub crop_yield_item_name: String,
    pub grid_position: IVec3,
    pub current_growth_stage: u32,
    pub is_watered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub tilled_ground_positions: Vec<IVec3>,
    pub planted_crops: Vec<PlantedCropSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FarmError {
    #[error("Cell {0} is not tilled")]
    NotTilled(IVec3),

    #[error("Cell {0} already has a crop")]
    Occupied(IVec3),

    #[error("Item '{0}' cannot be planted")]
    NotPlantable(String),
}

pub struct FarmingManager {
    id: UniqueId,
    active: bool,
    item_registry: Rc<ItemRegistry>,
    /// Tilled cell -> watered today
    tilled: HashMap<IVec3, bool>,
    crops: HashMap<IVec3, PlantedCrop>,
}

impl FarmingManager {
    pub fn new(item_registry: Rc<ItemRegistry>) -> Self {
        FarmingManager {
            id: UniqueId::fixed(FARMING_MANAGER_ID),
            active: true,
            item_registry,
            tilled: HashMap::new(),
            crops: HashMap::new(),
        }
    }

    /// Tills a cell; returns false if it was already tilled
    pub fn dig(&mut self, cell: IVec3) -> bool {
        if self.tilled.contains_key(&cell) {
            return false;
        }
        self.tilled.insert(cell, false);
        true
    }

    /// Waters a tilled cell and the crop on it, if any
    pub fn water(&mut self, cell: IVec3) -> Result<(), FarmError> {
        let watered = self.tilled.get_mut(&cell).ok_or(FarmError::NotTilled(cell))?;
        *watered = true;
        if let Some(crop) = self.crops.get_mut(&cell) {
            crop.is_watered = true;
        }
        Ok(())
    }

    /// Plants the crop grown from `item_id` on a tilled, empty cell
    ///
    /// A crop planted on soil watered earlier today starts out watered.
    pub fn plant(&mut self, cell: IVec3, item_id: &str) -> Result<(), FarmError> {
        let Some(&soil_watered) = self.tilled.get(&cell) else {
            return Err(FarmError::NotTilled(cell));
        };
        if self.crops.contains_key(&cell) {
            return Err(FarmError::Occupied(cell));
        }
        let (yield_item, crop) = self
            .item_registry
            .get(item_id)
            .and_then(|def| def.crop().map(|crop| (def.id.clone(), crop)))
            .ok_or_else(|| FarmError::NotPlantable(item_id.to_string()))?;

        let mut planted = PlantedCrop::new(yield_item, crop, cell);
        planted.is_watered = soil_watered;
        self.crops.insert(cell, planted);
        Ok(())
    }

    /// Grows every watered crop one stage, then dries all soil
    pub fn advance_day(&mut self) {
        let mut grown = 0;
        for crop in self.crops.values_mut() {
            if crop.is_watered {
                crop.grow();
                crop.is_watered = false;
                grown += 1;
            }
        }
        for watered in self.tilled.values_mut() {
            *watered = false;
        }
        info!(grown, crops = self.crops.len(), "Day advanced");
    }

    pub fn can_harvest(&self, cell: IVec3) -> bool {
        self.crops
            .get(&cell)
            .is_some_and(|crop| crop.is_harvestable())
    }

    /// Removes a grown crop, returning its yield; the cell stays tilled
    pub fn harvest(&mut self, cell: IVec3) -> Option<ItemStack> {
        if !self.can_harvest(cell) {
            return None;
        }
        let crop = self.crops.remove(&cell)?;
        if let Some(watered) = self.tilled.get_mut(&cell) {
            *watered = false;
        }
        Some(ItemStack::new(crop.yield_item, crop.crop.yield_amount))
    }

    pub fn crop_at(&self, cell: IVec3) -> Option<&PlantedCrop> {
        self.crops.get(&cell)
    }

    pub fn is_tilled(&self, cell: IVec3) -> bool {
        self.tilled.contains_key(&cell)
    }

    pub fn is_watered(&self, cell: IVec3) -> bool {
        self.tilled.get(&cell).copied().unwrap_or(false)
    }

    pub fn tilled_count(&self) -> usize {
        self.tilled.len()
    }

    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }
}

impl Saveable for FarmingManager {
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
        // Sorted so the same farm always writes the same file
        let mut tilled_ground_positions: Vec<IVec3> = self.tilled.keys().copied().collect();
        tilled_ground_positions.sort_by_key(|cell| cell.to_array());

        let mut planted_crops: Vec<PlantedCropSnapshot> = self
            .crops
            .values()
            .map(|crop| PlantedCropSnapshot {
                crop_yield_item_name: crop.yield_item.clone(),
                grid_position: crop.grid_position,
                current_growth_stage: crop.growth_stage,
                is_watered: crop.is_watered,
            })
            .collect();
        planted_crops.sort_by_key(|crop| crop.grid_position.to_array());

        Snapshot::Farm(FarmSnapshot {
            tilled_ground_positions,
            planted_crops,
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::Farm(saved) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "farm", snapshot));
        };

        self.crops.clear();
        self.tilled = saved
            .tilled_ground_positions
            .iter()
            .map(|&cell| (cell, false))
            .collect();

        for saved_crop in &saved.planted_crops {
            let resolved = self
                .item_registry
                .get(&saved_crop.crop_yield_item_name)
                .and_then(|def| def.crop().map(|crop| (def.id.clone(), crop)));
            let Some((yield_item, crop)) = resolved else {
                error!(
                    item = %saved_crop.crop_yield_item_name,
                    position = ?saved_crop.grid_position,
                    "Saved crop has no plantable item, skipping"
                );
                continue;
            };

            let cell = saved_crop.grid_position;
            let mut planted = PlantedCrop::new(yield_item, crop, cell);
            planted.set_stage(saved_crop.current_growth_stage);
            planted.is_watered = saved_crop.is_watered;

            let soil = self.tilled.entry(cell).or_insert(false);
            *soil |= planted.is_watered;
            self.crops.insert(cell, planted);
        }

        debug!(
            tilled = self.tilled.len(),
            crops = self.crops.len(),
            "Farm restored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm() -> FarmingManager {
        FarmingManager::new(Rc::new(ItemRegistry::create_default()))
    }

    fn cell(x: i32, y: i32) -> IVec3 {
        IVec3::new(x, y, 0)
    }

    #[test]
    fn test_plant_requires_tilled_empty_soil() {
        let mut farm = farm();
        assert_eq!(farm.plant(cell(0, 0), "carrot"), Err(FarmError::NotTilled(cell(0, 0))));

        assert!(farm.dig(cell(0, 0)));
        assert!(!farm.dig(cell(0, 0)));
        assert_eq!(
            farm.plant(cell(0, 0), "wood"),
            Err(FarmError::NotPlantable("wood".to_string()))
        );
        farm.plant(cell(0, 0), "Carrot").unwrap();
        assert_eq!(farm.plant(cell(0, 0), "wheat"), Err(FarmError::Occupied(cell(0, 0))));
        assert_eq!(farm.crop_at(cell(0, 0)).unwrap().yield_item, "carrot");
    }

    #[test]
    fn test_only_watered_crops_grow() {
        let mut farm = farm();
        farm.dig(cell(0, 0));
        farm.dig(cell(1, 0));
        farm.plant(cell(0, 0), "wheat").unwrap();
        farm.plant(cell(1, 0), "wheat").unwrap();

        farm.water(cell(0, 0)).unwrap();
        farm.advance_day();

        assert_eq!(farm.crop_at(cell(0, 0)).unwrap().growth_stage, 1);
        assert_eq!(farm.crop_at(cell(1, 0)).unwrap().growth_stage, 0);
        assert!(!farm.is_watered(cell(0, 0)));
    }

    #[test]
    fn test_harvest_fully_grown_crop() {
        let mut farm = farm();
        farm.dig(cell(2, 2));
        farm.plant(cell(2, 2), "wheat").unwrap();
        for _ in 0..2 {
            assert!(!farm.can_harvest(cell(2, 2)));
            farm.water(cell(2, 2)).unwrap();
            farm.advance_day();
        }

        assert!(farm.can_harvest(cell(2, 2)));
        assert_eq!(farm.harvest(cell(2, 2)), Some(ItemStack::new("wheat", 1)));
        assert!(farm.is_tilled(cell(2, 2)));
        assert_eq!(farm.crop_count(), 0);
        assert_eq!(farm.harvest(cell(2, 2)), None);
    }

    #[test]
    fn test_round_trip_rebuilds_indexes() {
        let mut farm = farm();
        farm.dig(cell(0, 0));
        farm.dig(cell(1, 0));
        farm.dig(cell(5, 5));
        farm.plant(cell(0, 0), "carrot").unwrap();
        farm.water(cell(0, 0)).unwrap();
        farm.advance_day();
        farm.water(cell(0, 0)).unwrap();
        farm.plant(cell(1, 0), "wheat").unwrap();
        let snapshot = farm.capture();

        let mut restored = FarmingManager::new(Rc::new(ItemRegistry::create_default()));
        restored.dig(cell(9, 9));
        restored.restore(&snapshot).unwrap();

        assert_eq!(restored.tilled_count(), 3);
        assert!(!restored.is_tilled(cell(9, 9)));
        assert_eq!(restored.crop_count(), 2);
        assert_eq!(restored.crop_at(cell(0, 0)).unwrap().growth_stage, 1);
        assert!(restored.crop_at(cell(0, 0)).unwrap().is_watered);
        assert!(restored.is_watered(cell(0, 0)));
        assert!(!restored.is_watered(cell(1, 0)));
        assert_eq!(restored.capture(), snapshot);
    }

    #[test]
    fn test_restore_skips_unknown_crops() {
        let mut farm = farm();
        let saved = Snapshot::Farm(FarmSnapshot {
            tilled_ground_positions: vec![cell(0, 0), cell(1, 0)],
            planted_crops: vec![
                PlantedCropSnapshot {
                    crop_yield_item_name: "moonflower".to_string(),
                    grid_position: cell(0, 0),
                    current_growth_stage: 1,
                    is_watered: false,
                },
                PlantedCropSnapshot {
                    crop_yield_item_name: "carrot".to_string(),
                    grid_position: cell(1, 0),
                    current_growth_stage: 3,
                    is_watered: false,
                },
            ],
        });

        farm.restore(&saved).unwrap();
        assert!(farm.crop_at(cell(0, 0)).is_none());
        assert!(farm.can_harvest(cell(1, 0)));
    }

    #[test]
    fn test_snapshot_field_names() {
        let mut farm = farm();
        farm.dig(cell(3, 4));
        farm.plant(cell(3, 4), "carrot").unwrap();

        let value = serde_json::to_value(farm.capture()).unwrap();
        assert_eq!(value["kind"], "farm");
        assert_eq!(value["state"]["tilled_ground_positions"][0], serde_json::json!([3, 4, 0]));
        assert_eq!(value["state"]["planted_crops"][0]["crop_yield_item_name"], "carrot");
    }
}
