use crate::item::CropData;
use glam::IVec3;
use tracing::debug;

/// A crop growing on one tilled cell
///
/// Crops grow one stage per day, but only on days they were watered.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantedCrop {
    /// Item produced on harvest; also what the crop is rebuilt from on load
    pub yield_item: String,
    pub crop: CropData,
    pub grid_position: IVec3,
    pub growth_stage: u32,
    pub is_watered: bool,
    harvestable: bool,
}

impl PlantedCrop {
    pub fn new(yield_item: impl Into<String>, crop: CropData, grid_position: IVec3) -> Self {
        let mut planted = PlantedCrop {
            yield_item: yield_item.into(),
            crop,
            grid_position,
            growth_stage: 0,
            is_watered: false,
            harvestable: false,
        };
        planted.refresh();
        planted
    }

    /// The last stage is the harvestable one
    pub fn is_fully_grown(&self) -> bool {
        self.growth_stage + 1 >= self.crop.growth_stages
    }

    pub fn is_harvestable(&self) -> bool {
        self.harvestable
    }

    /// Advances one stage and dries the soil
    pub fn grow(&mut self) {
        if self.is_fully_grown() {
            return;
        }
        self.growth_stage += 1;
        self.is_watered = false;
        debug!(position = ?self.grid_position, stage = self.growth_stage, "Crop grew");
        self.refresh();
    }

    /// Sets the stage directly, clamped to the crop's last stage
    pub fn set_stage(&mut self, stage: u32) {
        self.growth_stage = stage.min(self.crop.growth_stages.saturating_sub(1));
        self.refresh();
    }

    /// Re-derives state that depends on the growth stage
    pub fn refresh(&mut self) {
        self.harvestable = self.is_fully_grown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carrot() -> PlantedCrop {
        let crop = CropData {
            growth_stages: 3,
            yield_amount: 2,
        };
        PlantedCrop::new("carrot", crop, IVec3::ZERO)
    }

    #[test]
    fn test_grows_to_harvestable() {
        let mut planted = carrot();
        planted.is_watered = true;
        planted.grow();
        assert_eq!(planted.growth_stage, 1);
        assert!(!planted.is_watered);
        assert!(!planted.is_harvestable());

        planted.grow();
        planted.grow();
        assert_eq!(planted.growth_stage, 2);
        assert!(planted.is_harvestable());
    }

    #[test]
    fn test_set_stage_clamps() {
        let mut planted = carrot();
        planted.set_stage(9);
        assert_eq!(planted.growth_stage, 2);
        assert!(planted.is_harvestable());
    }
}
