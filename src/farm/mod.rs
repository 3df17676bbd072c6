// Farming module
//
// This module provides tilled soil and growing crops:
// - PlantedCrop growth stages and the harvestable flag
// - FarmingManager, the fixed-identity owner that persists every crop
//   and rebuilds them from the item database on load

pub mod crop;
pub mod manager;

pub use crop::PlantedCrop;
pub use manager::{FARMING_MANAGER_ID, FarmError, FarmSnapshot, FarmingManager, PlantedCropSnapshot};
