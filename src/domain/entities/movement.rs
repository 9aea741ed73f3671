use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "entrada")]
    Entry,
    #[serde(rename = "saida")]
    Exit,
    #[serde(rename = "transferencia")]
    Transfer,
}

/// Stock movement for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    #[serde(rename = "produto_id")]
    pub product_id: Uuid,
    #[serde(rename = "local_id", default)]
    pub location_id: Option<Uuid>,
    #[serde(rename = "tipo")]
    pub kind: MovementKind,
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    #[serde(rename = "observacao", default)]
    pub notes: Option<String>,
    #[serde(rename = "usuario_id", default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Movement {
    /// Effect on the product's total stock. Transfers move stock between
    /// locations and leave the total unchanged.
    pub fn signed_quantity(&self) -> f64 {
        match self.kind {
            MovementKind::Entry => self.quantity,
            MovementKind::Exit => -self.quantity,
            MovementKind::Transfer => 0.0,
        }
    }
}
