use serde::{Deserialize, Serialize};

/// Different categories of items with type-specific data
///
/// This enum enables different item types to have different behaviors
/// while sharing the core ItemDefinition structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemProperties {
    /// Basic material (no special properties)
    Material,

    /// Harvested produce that knows how to grow its own crop
    ///
    /// The farm looks crops up by their yield item when it replants them
    /// from a save file.
    Produce { crop: CropData },
}

/// Growth rules for a plantable crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropData {
    /// Number of visual stages; the last one is harvestable
    pub growth_stages: u32,

    /// How many yield items a harvest produces
    pub yield_amount: u32,
}
