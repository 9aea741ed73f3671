use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resource::Resource;

/// Stone stock is tracked at three granularities, one table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryKind {
    Block,
    Slab,
    Tile,
}

impl InventoryKind {
    pub fn resource(self) -> Resource {
        match self {
            Self::Block => Resource::Blocks,
            Self::Slab => Resource::Slabs,
            Self::Tile => Resource::Tiles,
        }
    }
}

/// Row of `blocos`, `chapas` or `ladrilhos`. Dimensions are in centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "produto_id", default)]
    pub product_id: Option<Uuid>,
    #[serde(rename = "local_id", default)]
    pub location_id: Option<Uuid>,
    #[serde(rename = "comprimento", default)]
    pub length_cm: Option<f64>,
    #[serde(rename = "largura", default)]
    pub width_cm: Option<f64>,
    #[serde(rename = "espessura", default)]
    pub thickness_cm: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl InventoryItem {
    pub fn area_m2(&self) -> Option<f64> {
        Some(self.length_cm? * self.width_cm? / 10_000.0)
    }
}
