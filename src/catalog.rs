//! Waste catalog
//!
//! Static table of waste items and the container each one belongs in. Each
//! container is permanently bound to one lane.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clamp_lane;

/// Waste category, doubling as the container and lane it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteType {
    Glass,
    Organic,
    Paper,
    Plastic,
}

impl WasteType {
    /// All types in lane order
    pub const ALL: [WasteType; 4] = [
        WasteType::Glass,
        WasteType::Organic,
        WasteType::Paper,
        WasteType::Plastic,
    ];

    /// Container for a lane index (clamped)
    pub fn from_lane(lane: usize) -> Self {
        Self::ALL[clamp_lane(lane as i64)]
    }

    pub fn lane(&self) -> usize {
        match self {
            WasteType::Glass => 0,
            WasteType::Organic => 1,
            WasteType::Paper => 2,
            WasteType::Plastic => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WasteType::Glass => "glass",
            WasteType::Organic => "organic",
            WasteType::Paper => "paper",
            WasteType::Plastic => "plastic",
        }
    }

    /// Container body color
    pub fn container_color(&self) -> &'static str {
        match self {
            WasteType::Glass => "#2E7D32",
            WasteType::Organic => "#5D4037",
            WasteType::Paper => "#1976D2",
            WasteType::Plastic => "#FFD700",
        }
    }
}

/// A single item the player has to classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteItem {
    pub id: &'static str,
    pub name: &'static str,
    pub correct_container: WasteType,
    pub description: &'static str,
}

const fn item(
    id: &'static str,
    name: &'static str,
    correct_container: WasteType,
    description: &'static str,
) -> WasteItem {
    WasteItem {
        id,
        name,
        correct_container,
        description,
    }
}

pub static WASTE_ITEMS: [WasteItem; 20] = [
    // Glass
    item("wine-bottle", "Wine bottle", WasteType::Glass, "Empty glass bottles go in the green bin."),
    item("jam-jar", "Jam jar", WasteType::Glass, "Rinse the jar and leave the lid for the yellow bin."),
    item("perfume-bottle", "Perfume bottle", WasteType::Glass, "Glass perfume bottles are recyclable glass."),
    item("beer-bottle", "Beer bottle", WasteType::Glass, "Glass bottles melt down into new bottles."),
    item("sauce-jar", "Sauce jar", WasteType::Glass, "Glass food jars belong with glass."),
    // Organic
    item("banana-peel", "Banana peel", WasteType::Organic, "Fruit scraps become compost."),
    item("apple-core", "Apple core", WasteType::Organic, "Food leftovers go in the brown bin."),
    item("eggshells", "Eggshells", WasteType::Organic, "Eggshells are organic waste."),
    item("coffee-grounds", "Coffee grounds", WasteType::Organic, "Used coffee grounds are compostable."),
    item("tea-leaves", "Tea leaves", WasteType::Organic, "Loose tea leaves are organic."),
    // Paper
    item("newspaper", "Newspaper", WasteType::Paper, "Clean newspaper goes in the blue bin."),
    item("cardboard-box", "Cardboard box", WasteType::Paper, "Flatten boxes before recycling them."),
    item("magazine", "Magazine", WasteType::Paper, "Magazines are recyclable paper."),
    item("paper-bag", "Paper bag", WasteType::Paper, "Paper bags belong with paper."),
    item("egg-carton", "Egg carton", WasteType::Paper, "Cardboard egg cartons are paper."),
    // Plastic and packaging
    item("water-bottle", "Plastic water bottle", WasteType::Plastic, "Plastic bottles go in the yellow bin."),
    item("yogurt-cup", "Yogurt cup", WasteType::Plastic, "Plastic cups are packaging."),
    item("soda-can", "Soda can", WasteType::Plastic, "Cans go with packaging in the yellow bin."),
    item("chip-bag", "Chip bag", WasteType::Plastic, "Snack wrappers are plastic packaging."),
    item("milk-carton", "Milk carton", WasteType::Plastic, "Drink cartons go with packaging."),
];

/// Pick a uniformly random item
pub fn random_item<R: Rng + ?Sized>(rng: &mut R) -> &'static WasteItem {
    &WASTE_ITEMS[rng.random_range(0..WASTE_ITEMS.len())]
}

/// Look up an item by id
pub fn find_item(id: &str) -> Option<&'static WasteItem> {
    WASTE_ITEMS.iter().find(|w| w.id == id)
}
